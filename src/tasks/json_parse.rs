// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::TaskError;
use crate::pipeline::{TaskResult, TaskRun, TaskType};
use crate::tasks::single_input;
use crate::traits::Task;

/// Extracts a value from a JSON document.
///
/// The input is either a JSON string, which is parsed, or an already
/// structured value. `path` walks object keys and array indices. With `lax`
/// set, a missing path segment yields `null` instead of an error.
#[derive(Debug, Clone, Default)]
pub struct JsonParseTask {
    path: Vec<String>,
    lax: bool,
}

impl JsonParseTask {
    pub fn new(path: Vec<String>, lax: bool) -> Self {
        Self { path, lax }
    }

    fn extract(&self, input: &Value) -> Result<Value, TaskError> {
        let document = match input {
            Value::String(raw) => serde_json::from_str(raw)
                .map_err(|e| TaskError::invalid_input(format!("input is not JSON: {}", e)))?,
            other => other.clone(),
        };

        let mut current = &document;
        for segment in &self.path {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None if self.lax => return Ok(Value::Null),
                None => {
                    return Err(TaskError::invalid_input(format!(
                        "path segment '{}' not found",
                        segment
                    )))
                }
            }
        }

        Ok(current.clone())
    }
}

#[async_trait]
impl Task for JsonParseTask {
    fn task_type(&self) -> TaskType {
        TaskType::JsonParse
    }

    async fn run(&self, _task_run: &TaskRun, inputs: Vec<TaskResult>) -> TaskResult {
        match single_input(&inputs).and_then(|input| self.extract(input)) {
            Ok(value) => TaskResult::ok(value),
            Err(error) => TaskResult::failed(error),
        }
    }
}
