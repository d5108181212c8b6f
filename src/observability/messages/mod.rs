// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! # Organization
//!
//! * `engine` - pipeline run admission, start, completion, cancellation
//! * `task` - TaskRun start, completion, panics and timeouts
//! * `validation` - graph validation failures and graph construction
//! * `keystore` - key store unlock and key lifecycle

use tracing::Span;

pub mod engine;
pub mod keystore;
pub mod task;
pub mod validation;

/// Emit a message as a structured `tracing` event.
pub trait StructuredLog {
    /// Log the message at its designated level with its fields attached.
    fn log(&self);

    /// A span carrying the message's fields, for messages that open a scope.
    fn span(&self, _name: &str) -> Span {
        Span::none()
    }
}
