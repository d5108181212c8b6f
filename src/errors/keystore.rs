// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Failures at the key material boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeyStoreError {
    #[error("failed to decrypt key {key_id}: {reason}")]
    Decrypt { key_id: String, reason: String },

    #[error("failed to encrypt key {key_id}: {reason}")]
    Encrypt { key_id: String, reason: String },

    #[error("failed to generate key: {0}")]
    Generate(String),

    #[error("key repository failure: {0}")]
    Repository(String),

    #[error("key {0} not found")]
    NotFound(String),
}
