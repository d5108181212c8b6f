// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::pipeline::{ResultError, TaskResult, TaskRun, TaskType};
use crate::traits::Task;

/// Synthetic sink appended to every graph.
///
/// Receives the results of all authored terminal tasks and reports them
/// positionally: `values[i]` and `errors[i]` are input `i`'s value and
/// error, unchanged. Its
/// completion is the signal that the whole run is complete. It never fails,
/// even when every input carries an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultTask;

#[async_trait]
impl Task for ResultTask {
    fn task_type(&self) -> TaskType {
        TaskType::Result
    }

    async fn run(&self, _task_run: &TaskRun, inputs: Vec<TaskResult>) -> TaskResult {
        let (values, errors) = inputs
            .into_iter()
            .map(|input| (input.value, input.error))
            .unzip();

        TaskResult {
            value: Value::Array(values),
            error: Some(ResultError::Collected(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TaskError;
    use crate::tasks::stub::task_run;
    use serde_json::json;

    #[tokio::test]
    async fn test_values_and_errors_are_positional() {
        let inputs = vec![
            TaskResult::ok(json!(5)),
            TaskResult::error("timeout"),
            TaskResult::ok(json!("x")),
        ];

        let result = ResultTask
            .run(&task_run("__result__", TaskType::Result, 3), inputs.clone())
            .await;
        let final_result = result.collected().unwrap();

        assert_eq!(final_result.len(), inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            assert_eq!(final_result.values[i], input.value);
            assert_eq!(final_result.errors[i], input.error);
        }
    }

    #[tokio::test]
    async fn test_all_error_inputs_still_produce_a_result() {
        let inputs = vec![TaskResult::error("a"), TaskResult::error("b")];

        let result = ResultTask
            .run(&task_run("__result__", TaskType::Result, 2), inputs)
            .await;
        let final_result = result.collected().unwrap();

        assert_eq!(final_result.values, vec![Value::Null, Value::Null]);
        assert_eq!(
            final_result.errors,
            vec![
                Some(ResultError::Task(TaskError::failed("a"))),
                Some(ResultError::Task(TaskError::failed("b"))),
            ]
        );
    }

    #[tokio::test]
    async fn test_collected_input_errors_are_kept_verbatim() {
        let upstream = ResultError::Collected(vec![
            None,
            Some(ResultError::Task(TaskError::failed("stale"))),
        ]);
        let inputs = vec![
            TaskResult {
                value: json!([1, null]),
                error: Some(upstream.clone()),
            },
            TaskResult::ok(json!(2)),
        ];

        let result = ResultTask
            .run(&task_run("__result__", TaskType::Result, 2), inputs)
            .await;
        let final_result = result.collected().unwrap();

        assert_eq!(final_result.errors, vec![Some(upstream), None]);
        assert_eq!(final_result.task_error(0), Some(&TaskError::failed("stale")));
    }

    #[tokio::test]
    async fn test_no_inputs_yields_empty_collections() {
        let result = ResultTask
            .run(&task_run("__result__", TaskType::Result, 0), vec![])
            .await;
        let final_result = result.collected().unwrap();
        assert!(final_result.is_empty());
        assert!(final_result.is_fully_successful());
    }
}
