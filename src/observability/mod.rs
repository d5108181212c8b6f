// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic and operational log line emitted by the engine goes
//! through a message struct from [`messages`]. Each struct implements
//! `Display` for the human-readable text and [`messages::StructuredLog`] to
//! emit the event at its level with typed fields attached.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - pipeline run lifecycle
//! * `messages::task` - TaskRun execution events
//! * `messages::validation` - graph validation and construction
//! * `messages::keystore` - key material unlock, generation and deletion
//!
//! # Usage
//!
//! ```rust
//! use pipeline_core::observability::messages::{task::TaskCompleted, StructuredLog};
//! use pipeline_core::pipeline::RunId;
//! use std::time::Duration;
//!
//! TaskCompleted {
//!     run_id: RunId::new(),
//!     task_id: "median",
//!     task_type: "median",
//!     duration: Duration::from_millis(3),
//!     errored: false,
//! }
//! .log();
//! ```

pub mod messages;
