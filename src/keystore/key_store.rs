// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::errors::{ErrorAccumulator, KeyStoreError, MultiError};
use crate::keystore::{
    DecryptedKey, EncryptedKey, EncryptedKeyRepository, KeyCipher, KeyId, KeyKind,
};
use crate::observability::messages::keystore::{
    KeyDeleted, KeyGenerated, KeyStoreUnlocked, KeyUnlocked,
};
use crate::observability::messages::StructuredLog;

/// Length of generated key material in bytes.
const KEY_MATERIAL_LEN: usize = 32;

/// Owned cache of decrypted keys backed by an encrypted repository.
///
/// Lock discipline: a single `RwLock` guards the decrypted keys. Readers
/// take the read lock for a lookup; mutations take the write lock only to
/// swap entries in, never while the repository or cipher is working, and
/// never across an `.await`.
pub struct KeyStore {
    repository: Arc<dyn EncryptedKeyRepository>,
    cipher: Arc<dyn KeyCipher>,
    keys: RwLock<HashMap<KeyId, DecryptedKey>>,
}

impl KeyStore {
    pub fn new(repository: Arc<dyn EncryptedKeyRepository>, cipher: Arc<dyn KeyCipher>) -> Self {
        Self {
            repository,
            cipher,
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Decrypt every stored record with `password` and cache the results.
    ///
    /// Every record is attempted. Keys that decrypt are cached even when
    /// others fail; all failures are returned together. On success returns
    /// the number of keys unlocked.
    pub async fn unlock(&self, password: &str) -> Result<usize, MultiError<KeyStoreError>> {
        let mut errors = ErrorAccumulator::new();

        let records = errors
            .absorb(self.repository.find_all().await)
            .unwrap_or_default();

        let mut unlocked = Vec::with_capacity(records.len());
        for record in &records {
            if let Some(material) = errors.absorb(self.cipher.decrypt(record, password)) {
                KeyUnlocked {
                    key_id: record.id.as_str(),
                }
                .log();
                unlocked.push(DecryptedKey {
                    id: record.id.clone(),
                    kind: record.kind,
                    material,
                });
            }
        }

        let count = unlocked.len();
        {
            let mut keys = self.keys.write();
            for key in unlocked {
                keys.insert(key.id.clone(), key);
            }
        }

        KeyStoreUnlocked {
            unlocked: count,
            failed: errors.len(),
        }
        .log();

        errors.finish_with(count)
    }

    pub fn decrypted_key(&self, id: &KeyId) -> Option<DecryptedKey> {
        self.keys.read().get(id).cloned()
    }

    /// Ids of every cached key of `kind`, sorted.
    pub fn unlocked_ids(&self, kind: KeyKind) -> Vec<KeyId> {
        let mut ids: Vec<KeyId> = self
            .keys
            .read()
            .values()
            .filter(|key| key.kind == kind)
            .map(|key| key.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Create fresh key material, persist it encrypted, then cache it.
    ///
    /// The key only becomes visible through [`decrypted_key`](Self::decrypted_key)
    /// once the encrypted record is stored.
    pub async fn generate_key(
        &self,
        kind: KeyKind,
        password: &str,
    ) -> Result<(DecryptedKey, EncryptedKey), KeyStoreError> {
        let material: [u8; KEY_MATERIAL_LEN] = rand::random();
        let key = DecryptedKey {
            id: KeyId::generate(),
            kind,
            material: material.to_vec(),
        };

        let ciphertext = self.cipher.encrypt(&key, password)?;
        let now = Utc::now();
        let record = EncryptedKey {
            id: key.id.clone(),
            kind,
            ciphertext,
            created_at: now,
            updated_at: now,
        };

        self.repository.upsert(record.clone()).await?;
        self.keys.write().insert(key.id.clone(), key.clone());

        KeyGenerated {
            key_id: key.id.as_str(),
        }
        .log();
        Ok((key, record))
    }

    /// Remove a key from the repository and the cache.
    pub async fn delete_key(&self, id: &KeyId) -> Result<(), KeyStoreError> {
        if !self.repository.delete(id).await? {
            return Err(KeyStoreError::NotFound(id.to_string()));
        }
        self.keys.write().remove(id);
        KeyDeleted { key_id: id.as_str() }.log();
        Ok(())
    }
}
