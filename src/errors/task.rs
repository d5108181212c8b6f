// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Data-level failure of a single task.
///
/// A `TaskError` travels inside a [`TaskResult`](crate::pipeline::TaskResult)
/// like any other output. Successors see it as an ordinary input and the
/// result task reports it positionally; it never aborts the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TaskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("timeout after {millis}ms")]
    Timeout { millis: u64 },

    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

impl TaskError {
    pub fn failed(message: impl Into<String>) -> Self {
        TaskError::Failed(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        TaskError::InvalidInput(message.into())
    }
}
