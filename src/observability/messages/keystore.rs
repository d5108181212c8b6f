// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for key store events. Key material never appears in them.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// One stored key was decrypted into the cache.
///
/// # Log Level
/// `debug!`
pub struct KeyUnlocked<'a> {
    pub key_id: &'a str,
}

impl Display for KeyUnlocked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unlocked key {}", self.key_id)
    }
}

impl StructuredLog for KeyUnlocked<'_> {
    fn log(&self) {
        tracing::debug!(key_id = self.key_id, "{}", self);
    }
}

/// An unlock pass finished.
///
/// # Log Level
/// `info!` when every record decrypted, `warn!` otherwise
pub struct KeyStoreUnlocked {
    pub unlocked: usize,
    pub failed: usize,
}

impl Display for KeyStoreUnlocked {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Key store unlock finished: {} keys unlocked, {} failed",
            self.unlocked, self.failed
        )
    }
}

impl StructuredLog for KeyStoreUnlocked {
    fn log(&self) {
        if self.failed == 0 {
            tracing::info!(unlocked = self.unlocked, failed = self.failed, "{}", self);
        } else {
            tracing::warn!(unlocked = self.unlocked, failed = self.failed, "{}", self);
        }
    }
}

/// A new key was generated and persisted.
///
/// # Log Level
/// `info!`
pub struct KeyGenerated<'a> {
    pub key_id: &'a str,
}

impl Display for KeyGenerated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Generated key {}", self.key_id)
    }
}

impl StructuredLog for KeyGenerated<'_> {
    fn log(&self) {
        tracing::info!(key_id = self.key_id, "{}", self);
    }
}

/// A key was removed from the repository and the cache.
///
/// # Log Level
/// `info!`
pub struct KeyDeleted<'a> {
    pub key_id: &'a str,
}

impl Display for KeyDeleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Deleted key {}", self.key_id)
    }
}

impl StructuredLog for KeyDeleted<'_> {
    fn log(&self) {
        tracing::info!(key_id = self.key_id, "{}", self);
    }
}
