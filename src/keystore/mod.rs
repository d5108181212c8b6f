// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Key material boundary.
//!
//! Tasks that sign or authenticate need decrypted key material at run time.
//! [`KeyStore`] is the owned cache of decrypted keys; how records are
//! encrypted ([`KeyCipher`]) and where they are stored
//! ([`EncryptedKeyRepository`]) are pluggable.

mod cipher;
mod key;
mod key_store;
mod repository;

pub use cipher::KeyCipher;
pub use key::{DecryptedKey, EncryptedKey, KeyId, KeyKind};
pub use key_store::KeyStore;
pub use repository::{EncryptedKeyRepository, InMemoryKeyRepository};
