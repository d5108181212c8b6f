// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;        // pipeline declarations, loading, runtime assembly
pub mod engine;        // event-driven runner
pub mod errors;        // error handling
pub mod graph;         // validated task graphs
pub mod keystore;      // decrypted key cache
pub mod observability;
pub mod pipeline;      // runs, task runs, results
pub mod store;         // task run persistence
pub mod tasks;         // built-in task types
pub mod traits;        // Task and TaskRunStore seams
