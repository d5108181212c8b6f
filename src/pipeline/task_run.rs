// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TaskResult, TaskType};

/// Identifier of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one task execution within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskRunId(pub Uuid);

impl TaskRunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scheduling state of a TaskRun inside the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskRunStatus {
    /// Waiting for at least one predecessor result.
    Pending,
    /// Every input slot is filled; eligible for admission.
    Ready,
    /// Admitted; `run` is in flight.
    Running,
    /// Result written.
    Complete,
}

/// Execution record for one (pipeline run, task) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRun {
    pub id: TaskRunId,
    pub pipeline_run_id: RunId,
    pub task_id: String,
    pub task_type: TaskType,
    pub predecessor_count: usize,
    pub result: Option<TaskResult>,
    pub created_at: DateTime<Utc>,
    /// Set when a runner claims the TaskRun for execution.
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TaskRun {
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }
}

/// A single execution of a whole graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub id: RunId,
    /// Task id to its TaskRun for this run.
    pub task_runs: HashMap<String, TaskRunId>,
    pub result_task_run_id: TaskRunId,
    pub created_at: DateTime<Utc>,
}

impl PipelineRun {
    pub fn task_run_id(&self, task_id: &str) -> Option<TaskRunId> {
        self.task_runs.get(task_id).copied()
    }
}
