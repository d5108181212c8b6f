// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::pipeline::{BaseTask, RunId, TaskResult, TaskRun, TaskRunId, TaskType};

/// Persistence boundary for TaskRun records.
///
/// The runner relies on `complete_task_run` returning only after the result
/// is durable; successors are notified afterwards.
#[async_trait]
pub trait TaskRunStore: Send + Sync {
    /// Create a pending TaskRun for `task` within run `run_id`.
    async fn create_task_run(
        &self,
        run_id: RunId,
        task: &BaseTask,
        task_type: TaskType,
    ) -> Result<TaskRunId, StoreError>;

    /// Claim a pending TaskRun for execution and return it.
    ///
    /// The check and the claim are one atomic step: for any TaskRun exactly
    /// one caller succeeds, however many race. Later callers get
    /// `AlreadyStarted` (or `AlreadyCompleted`).
    async fn start_task_run(&self, id: TaskRunId) -> Result<TaskRun, StoreError>;

    /// Record the result of a TaskRun. A TaskRun is completed at most once.
    async fn complete_task_run(&self, id: TaskRunId, result: TaskResult) -> Result<(), StoreError>;

    /// Point lookup of one TaskRun.
    async fn get_task_run(&self, id: TaskRunId) -> Result<TaskRun, StoreError>;
}
