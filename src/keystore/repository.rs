// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::KeyStoreError;
use crate::keystore::{EncryptedKey, KeyId};

/// Durable storage of encrypted key records.
#[async_trait]
pub trait EncryptedKeyRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<EncryptedKey>, KeyStoreError>;

    async fn find(&self, id: &KeyId) -> Result<Option<EncryptedKey>, KeyStoreError>;

    /// Insert or replace the record with the same id.
    async fn upsert(&self, record: EncryptedKey) -> Result<(), KeyStoreError>;

    /// Remove a record. Returns whether it existed.
    async fn delete(&self, id: &KeyId) -> Result<bool, KeyStoreError>;
}

/// Process-local repository, ordered by key id.
#[derive(Debug, Default)]
pub struct InMemoryKeyRepository {
    records: RwLock<BTreeMap<KeyId, EncryptedKey>>,
}

impl InMemoryKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl EncryptedKeyRepository for InMemoryKeyRepository {
    async fn find_all(&self) -> Result<Vec<EncryptedKey>, KeyStoreError> {
        Ok(self.records.read().values().cloned().collect())
    }

    async fn find(&self, id: &KeyId) -> Result<Option<EncryptedKey>, KeyStoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn upsert(&self, record: EncryptedKey) -> Result<(), KeyStoreError> {
        self.records.write().insert(record.id.clone(), record);
        Ok(())
    }

    async fn delete(&self, id: &KeyId) -> Result<bool, KeyStoreError> {
        Ok(self.records.write().remove(id).is_some())
    }
}
