// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph validation and construction.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Cyclic dependency detected in a declared graph.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use pipeline_core::observability::messages::validation::CyclicDependencyDetected;
///
/// let cycle = vec!["fetch".to_string(), "parse".to_string(), "fetch".to_string()];
/// let msg = CyclicDependencyDetected { cycle: &cycle };
///
/// tracing::error!("{}", msg);
/// ```
pub struct CyclicDependencyDetected<'a> {
    pub cycle: &'a [String],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic dependency detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
        )
    }
}

/// A task references a predecessor that was never declared.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnresolvedDependency<'a> {
    pub task_id: &'a str,
    pub missing_dependency: &'a str,
}

impl Display for UnresolvedDependency<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' depends on missing task '{}'",
            self.task_id, self.missing_dependency
        )
    }
}

impl StructuredLog for UnresolvedDependency<'_> {
    fn log(&self) {
        tracing::error!(
            task_id = self.task_id,
            missing_dependency = self.missing_dependency,
            "{}", self
        );
    }
}

/// Graph validation rejected a declaration set.
///
/// # Log Level
/// `warn!` - Caller receives the full error list
pub struct ValidationFailed {
    pub task_count: usize,
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Graph validation failed for {} tasks with {} errors",
            self.task_count, self.error_count
        )
    }
}

impl StructuredLog for ValidationFailed {
    fn log(&self) {
        tracing::warn!(
            task_count = self.task_count,
            error_count = self.error_count,
            "{}", self
        );
    }
}

/// A graph was built and the result task attached.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GraphBuilt<'a> {
    pub task_count: usize,
    pub terminal_tasks: &'a [String],
    pub result_task_id: &'a str,
}

impl Display for GraphBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built graph with {} tasks; terminals [{}] feed '{}'",
            self.task_count,
            self.terminal_tasks.join(", "),
            self.result_task_id
        )
    }
}

impl StructuredLog for GraphBuilt<'_> {
    fn log(&self) {
        tracing::info!(
            task_count = self.task_count,
            terminal_count = self.terminal_tasks.len(),
            result_task_id = self.result_task_id,
            "{}", self
        );
    }
}
