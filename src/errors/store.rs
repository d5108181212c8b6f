// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::pipeline::TaskRunId;

/// Failures reported by a [`TaskRunStore`](crate::traits::TaskRunStore).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("task run {0} not found")]
    NotFound(TaskRunId),

    #[error("task run {0} is already complete")]
    AlreadyCompleted(TaskRunId),

    #[error("task run {0} was already started")]
    AlreadyStarted(TaskRunId),

    #[error("store backend failure: {0}")]
    Backend(String),
}
