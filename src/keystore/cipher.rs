// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::KeyStoreError;
use crate::keystore::{DecryptedKey, EncryptedKey};

/// Password-based encryption of key material.
pub trait KeyCipher: Send + Sync {
    fn encrypt(&self, key: &DecryptedKey, password: &str) -> Result<Vec<u8>, KeyStoreError>;

    /// Recover the material of `record`. A wrong password is an error.
    fn decrypt(&self, record: &EncryptedKey, password: &str) -> Result<Vec<u8>, KeyStoreError>;
}
