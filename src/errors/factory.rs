// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::pipeline::TaskType;

/// A task declaration that could not be turned into a task instance.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaskFactoryError {
    #[error("task '{task_id}' ({task_type}): invalid options: {reason}")]
    InvalidOptions {
        task_id: String,
        task_type: TaskType,
        reason: String,
    },
}
