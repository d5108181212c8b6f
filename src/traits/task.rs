// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::pipeline::{TaskResult, TaskRun, TaskType};

/// A unit of computation in a pipeline graph.
///
/// Implementations are stateless with respect to runs: configuration is fixed
/// when the task is built and one instance is shared by every concurrent run
/// of its graph.
#[async_trait]
pub trait Task: Send + Sync {
    /// The kind tag of this task.
    fn task_type(&self) -> TaskType;

    /// Compute this task's result.
    ///
    /// `inputs[i]` is the result of the predecessor declared at input slot
    /// `i`, regardless of which predecessor finished first. Predecessor
    /// failures arrive as ordinary inputs with `error` set; each task decides
    /// whether to propagate, tolerate or ignore them. Recoverable failures are
    /// returned as a failed [`TaskResult`] rather than by panicking.
    async fn run(&self, task_run: &TaskRun, inputs: Vec<TaskResult>) -> TaskResult;
}
