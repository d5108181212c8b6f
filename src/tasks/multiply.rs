// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::TaskError;
use crate::pipeline::{TaskResult, TaskRun, TaskType};
use crate::tasks::{as_number, number_value, single_input};
use crate::traits::Task;

/// Multiplies its single numeric input by a constant.
#[derive(Debug, Clone)]
pub struct MultiplyTask {
    times: f64,
}

impl MultiplyTask {
    pub fn new(times: f64) -> Self {
        Self { times }
    }
}

#[async_trait]
impl Task for MultiplyTask {
    fn task_type(&self) -> TaskType {
        TaskType::Multiply
    }

    async fn run(&self, _task_run: &TaskRun, inputs: Vec<TaskResult>) -> TaskResult {
        let product = single_input(&inputs).and_then(|value| {
            let n = as_number(value)
                .ok_or_else(|| TaskError::invalid_input(format!("{} is not a number", value)))?;
            number_value(n * self.times)
        });

        match product {
            Ok(value) => TaskResult::ok(value),
            Err(error) => TaskResult::failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::stub::task_run;
    use serde_json::json;

    #[tokio::test]
    async fn test_multiplies_numeric_string() {
        let task = MultiplyTask::new(100.0);
        let result = task
            .run(
                &task_run("scaled", TaskType::Multiply, 1),
                vec![TaskResult::ok(json!("1.5"))],
            )
            .await;
        assert_eq!(result, TaskResult::ok(json!(150.0)));
    }

    #[tokio::test]
    async fn test_non_numeric_input_fails() {
        let task = MultiplyTask::new(2.0);
        let result = task
            .run(
                &task_run("scaled", TaskType::Multiply, 1),
                vec![TaskResult::ok(json!({"a": 1}))],
            )
            .await;
        assert!(matches!(result.task_error(), Some(TaskError::InvalidInput(_))));
    }
}
