// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::StoreError;
use crate::pipeline::RunId;

/// Infrastructure-level failures that stop a pipeline run.
///
/// Unlike [`TaskError`](super::TaskError), these never flow to successor
/// tasks. They are returned to whoever started the run.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("failed to admit run {run_id}: {source}")]
    Admission {
        run_id: RunId,
        #[source]
        source: StoreError,
    },

    #[error("run {run_id}: failed to persist result of task '{task_id}': {source}")]
    Persistence {
        run_id: RunId,
        task_id: String,
        #[source]
        source: StoreError,
    },

    #[error("run {run_id}: task '{task_id}' panicked: {message}")]
    TaskPanicked {
        run_id: RunId,
        task_id: String,
        message: String,
    },

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("run {run_id} was cancelled")]
    Cancelled { run_id: RunId },

    #[error("run {run_id}: failed to read the result task run: {source}")]
    CompletionLookup {
        run_id: RunId,
        #[source]
        source: StoreError,
    },

    #[error("internal execution error: {message}")]
    Internal { message: String },
}

/// Violations of the per-TaskRun state machine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchedulingError {
    #[error("task '{task_id}' admitted with {received} of {expected} inputs")]
    NotReady {
        task_id: String,
        received: usize,
        expected: usize,
    },

    #[error("task '{task_id}' was already admitted")]
    AlreadyAdmitted { task_id: String },

    #[error("task '{task_id}' received input for slot {index} but has {expected} slots")]
    InputOutOfRange {
        task_id: String,
        index: usize,
        expected: usize,
    },

    #[error("task '{task_id}' received a second input for slot {index}")]
    DuplicateInput { task_id: String, index: usize },

    #[error("task '{task_id}' completed while not running")]
    InvalidCompletion { task_id: String },
}

/// What the runner does when a task's `run` panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanicPolicy {
    /// Treat the panic as an infrastructure failure and stop the run.
    #[default]
    FailRun,
    /// Record the panic as a data-level error for that TaskRun only.
    FailTask,
}
