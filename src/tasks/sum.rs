// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::TaskError;
use crate::pipeline::{TaskResult, TaskRun, TaskType};
use crate::tasks::{as_number, number_value};
use crate::traits::Task;

/// Adds all of its inputs. Any errored or non-numeric input fails the sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumTask;

impl SumTask {
    fn sum(inputs: &[TaskResult]) -> Result<serde_json::Value, TaskError> {
        let mut total = 0.0;
        for (i, input) in inputs.iter().enumerate() {
            if let Some(error) = input.task_error() {
                return Err(TaskError::Upstream(format!("input {}: {}", i, error)));
            }
            total += as_number(&input.value).ok_or_else(|| {
                TaskError::invalid_input(format!("input {} is not a number", i))
            })?;
        }
        number_value(total)
    }
}

#[async_trait]
impl Task for SumTask {
    fn task_type(&self) -> TaskType {
        TaskType::Sum
    }

    async fn run(&self, _task_run: &TaskRun, inputs: Vec<TaskResult>) -> TaskResult {
        match Self::sum(&inputs) {
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
    async fn test_sums_mixed_numeric_inputs() {
        let inputs = vec![
            TaskResult::ok(json!(1)),
            TaskResult::ok(json!("2.5")),
            TaskResult::ok(json!(0.5)),
        ];
        let result = SumTask.run(&task_run("total", TaskType::Sum, 3), inputs).await;
        assert_eq!(result, TaskResult::ok(json!(4.0)));
    }

    #[tokio::test]
    async fn test_any_errored_input_fails_the_sum() {
        let inputs = vec![TaskResult::ok(json!(1)), TaskResult::error("timeout")];
        let result = SumTask.run(&task_run("total", TaskType::Sum, 2), inputs).await;
        assert_eq!(
            result.task_error(),
            Some(&TaskError::Upstream("input 1: timeout".into()))
        );
    }
}
