// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline run lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Run admission (TaskRun creation)
//! * Run execution start, completion and failure
//! * Cancellation

use crate::observability::messages::StructuredLog;
use crate::pipeline::RunId;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A run was admitted and its TaskRuns created.
///
/// # Log Level
/// `debug!` - Bookkeeping detail
pub struct RunAdmitted {
    pub run_id: RunId,
    pub task_run_count: usize,
}

impl Display for RunAdmitted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Admitted run {} with {} task runs",
            self.run_id, self.task_run_count
        )
    }
}

impl StructuredLog for RunAdmitted {
    fn log(&self) {
        tracing::debug!(
            run_id = %self.run_id,
            task_run_count = self.task_run_count,
            "{}", self
        );
    }
}

/// Execution of a run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use pipeline_core::observability::messages::engine::RunStarted;
/// use pipeline_core::pipeline::RunId;
///
/// let msg = RunStarted {
///     run_id: RunId::new(),
///     task_count: 5,
///     max_concurrency: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted {
    pub run_id: RunId,
    pub task_count: usize,
    pub max_concurrency: usize,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting run {}: {} tasks, max_concurrency={}",
            self.run_id, self.task_count, self.max_concurrency
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            run_id = %self.run_id,
            task_count = self.task_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_run",
            span_name = name,
            run_id = %self.run_id,
            task_count = self.task_count,
        )
    }
}

/// A run completed; the result task has a result.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted {
    pub run_id: RunId,
    pub duration: Duration,
    pub result_count: usize,
    pub error_count: usize,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run {} completed in {:?}: {} results, {} errors",
            self.run_id, self.duration, self.result_count, self.error_count
        )
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            run_id = %self.run_id,
            duration_ms = u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
            result_count = self.result_count,
            error_count = self.error_count,
            "{}", self
        );
    }
}

/// A run was cancelled before its result task completed.
///
/// # Log Level
/// `warn!` - Run stopped without a result
pub struct RunCancelled {
    pub run_id: RunId,
}

impl Display for RunCancelled {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Run {} cancelled", self.run_id)
    }
}

impl StructuredLog for RunCancelled {
    fn log(&self) {
        tracing::warn!(run_id = %self.run_id, "{}", self);
    }
}

/// A run stopped on an infrastructure failure.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RunFailed<'a> {
    pub run_id: RunId,
    pub error: &'a dyn std::error::Error,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Run {} failed: {}", self.run_id, self.error)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(
            run_id = %self.run_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "run_failed",
            span_name = name,
            run_id = %self.run_id,
            error = %self.error,
        )
    }
}
