// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Core pipeline records: task identity, task results and task runs.

mod base_task;
mod result;
mod task_run;
mod task_type;

pub use base_task::{BaseTask, SuccessorEdge};
pub use result::{FinalResult, ResultError, TaskResult};
pub use task_run::{PipelineRun, RunId, TaskRun, TaskRunId, TaskRunStatus};
pub use task_type::TaskType;
