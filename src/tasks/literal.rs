// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::pipeline::{TaskResult, TaskRun, TaskType};
use crate::traits::Task;

/// Produces a fixed value. Inputs, if any, are ignored.
#[derive(Debug, Clone)]
pub struct LiteralTask {
    value: Value,
}

impl LiteralTask {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

#[async_trait]
impl Task for LiteralTask {
    fn task_type(&self) -> TaskType {
        TaskType::Literal
    }

    async fn run(&self, _task_run: &TaskRun, _inputs: Vec<TaskResult>) -> TaskResult {
        TaskResult::ok(self.value.clone())
    }
}
