// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for TaskRun execution events.

use crate::observability::messages::StructuredLog;
use crate::pipeline::RunId;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A TaskRun was admitted and its task invoked.
///
/// # Log Level
/// `debug!` - Per-task detail
pub struct TaskStarted<'a> {
    pub run_id: RunId,
    pub task_id: &'a str,
    pub task_type: &'a str,
    pub input_count: usize,
}

impl Display for TaskStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting task '{}' ({}) with {} inputs",
            self.task_id, self.task_type, self.input_count
        )
    }
}

impl StructuredLog for TaskStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            run_id = %self.run_id,
            task_id = self.task_id,
            task_type = self.task_type,
            input_count = self.input_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "task_run",
            span_name = name,
            run_id = %self.run_id,
            task_id = self.task_id,
            task_type = self.task_type,
        )
    }
}

/// A task returned its result, errored or not.
///
/// # Log Level
/// `debug!` - Per-task detail
pub struct TaskCompleted<'a> {
    pub run_id: RunId,
    pub task_id: &'a str,
    pub task_type: &'a str,
    pub duration: Duration,
    pub errored: bool,
}

impl Display for TaskCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let outcome = if self.errored { "with error" } else { "successfully" };
        write!(
            f,
            "Task '{}' ({}) completed {} in {:?}",
            self.task_id, self.task_type, outcome, self.duration
        )
    }
}

impl StructuredLog for TaskCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            run_id = %self.run_id,
            task_id = self.task_id,
            task_type = self.task_type,
            duration_ms = u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
            errored = self.errored,
            "{}", self
        );
    }
}

/// A task's `run` panicked.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct TaskPanicked<'a> {
    pub run_id: RunId,
    pub task_id: &'a str,
    pub message: &'a str,
    pub fails_run: bool,
}

impl Display for TaskPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task '{}' panicked: {}", self.task_id, self.message)
    }
}

impl StructuredLog for TaskPanicked<'_> {
    fn log(&self) {
        tracing::error!(
            run_id = %self.run_id,
            task_id = self.task_id,
            panic_message = self.message,
            fails_run = self.fails_run,
            "{}", self
        );
    }
}

/// A task exceeded the configured per-task timeout.
///
/// # Log Level
/// `warn!` - Recorded as a data-level error
pub struct TaskTimedOut<'a> {
    pub run_id: RunId,
    pub task_id: &'a str,
    pub timeout: Duration,
}

impl Display for TaskTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' timed out after {:?}",
            self.task_id, self.timeout
        )
    }
}

impl StructuredLog for TaskTimedOut<'_> {
    fn log(&self) {
        tracing::warn!(
            run_id = %self.run_id,
            task_id = self.task_id,
            timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            "{}", self
        );
    }
}

/// A result was produced after cancellation and dropped.
///
/// # Log Level
/// `debug!`
pub struct TaskResultDiscarded<'a> {
    pub run_id: RunId,
    pub task_id: &'a str,
}

impl Display for TaskResultDiscarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discarding result of task '{}': run {} was cancelled",
            self.task_id, self.run_id
        )
    }
}

impl StructuredLog for TaskResultDiscarded<'_> {
    fn log(&self) {
        tracing::debug!(run_id = %self.run_id, task_id = self.task_id, "{}", self);
    }
}

/// A TaskRun was never admitted because the run stopped first.
///
/// # Log Level
/// `trace!`
pub struct TaskSkipped<'a> {
    pub run_id: RunId,
    pub task_id: &'a str,
    pub received: usize,
    pub expected: usize,
}

impl Display for TaskSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' not admitted ({} of {} inputs received)",
            self.task_id, self.received, self.expected
        )
    }
}

impl StructuredLog for TaskSkipped<'_> {
    fn log(&self) {
        tracing::trace!(
            run_id = %self.run_id,
            task_id = self.task_id,
            received = self.received,
            expected = self.expected,
            "{}", self
        );
    }
}
