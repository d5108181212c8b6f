// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::*;
use crate::config::TaskConfig;
use crate::errors::{ErrorAccumulator, MultiError, TaskFactoryError};
use crate::graph::TaskDeclaration;
use crate::pipeline::TaskType;
use crate::traits::Task;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LiteralOptions {
    value: Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonParseOptions {
    #[serde(default)]
    path: Vec<String>,
    #[serde(default)]
    lax: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MultiplyOptions {
    times: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MedianOptions {
    allowed_faults: Option<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoOptions {}

/// Creates task instances from declarations.
pub struct TaskFactory;

impl TaskFactory {
    /// Create a task instance from its type tag and options.
    ///
    /// - `literal` -> [`LiteralTask`] (`value`, required)
    /// - `json_parse` -> [`JsonParseTask`] (`path`, `lax`)
    /// - `multiply` -> [`MultiplyTask`] (`times`, required)
    /// - `sum` -> [`SumTask`]
    /// - `median` -> [`MedianTask`] (`allowed_faults`)
    /// - `result` -> [`ResultTask`]; graph validation rejects it when declared
    ///
    /// Unknown options are rejected.
    pub fn create_task(
        id: &str,
        task_type: TaskType,
        options: &HashMap<String, serde_yaml::Value>,
    ) -> Result<Arc<dyn Task>, TaskFactoryError> {
        let invalid = |reason: String| TaskFactoryError::InvalidOptions {
            task_id: id.to_string(),
            task_type,
            reason,
        };

        let task: Arc<dyn Task> = match task_type {
            TaskType::Literal => {
                let LiteralOptions { value } = parse_options(options).map_err(invalid)?;
                Arc::new(LiteralTask::new(value))
            }
            TaskType::JsonParse => {
                let JsonParseOptions { path, lax } = parse_options(options).map_err(invalid)?;
                Arc::new(JsonParseTask::new(path, lax))
            }
            TaskType::Multiply => {
                let MultiplyOptions { times } = parse_options(options).map_err(invalid)?;
                Arc::new(MultiplyTask::new(times))
            }
            TaskType::Sum => {
                let NoOptions {} = parse_options(options).map_err(invalid)?;
                Arc::new(SumTask)
            }
            TaskType::Median => {
                let MedianOptions { allowed_faults } = parse_options(options).map_err(invalid)?;
                Arc::new(MedianTask::new(allowed_faults))
            }
            TaskType::Result => {
                let NoOptions {} = parse_options(options).map_err(invalid)?;
                Arc::new(ResultTask)
            }
        };

        Ok(task)
    }

    /// Turn every task config into a declaration, reporting all failures.
    pub fn create_declarations(
        configs: &[TaskConfig],
    ) -> Result<Vec<TaskDeclaration>, MultiError<TaskFactoryError>> {
        let mut errors = ErrorAccumulator::new();
        let mut declarations = Vec::with_capacity(configs.len());

        for cfg in configs {
            if let Some(task) = errors.absorb(Self::create_task(&cfg.id, cfg.task_type, &cfg.options)) {
                declarations.push(TaskDeclaration::new(
                    cfg.id.clone(),
                    task,
                    cfg.inputs.clone(),
                ));
            }
        }

        errors.finish_with(declarations)
    }
}

fn parse_options<T: DeserializeOwned>(
    options: &HashMap<String, serde_yaml::Value>,
) -> Result<T, String> {
    let mapping: serde_yaml::Mapping = options
        .iter()
        .map(|(key, value)| (serde_yaml::Value::String(key.clone()), value.clone()))
        .collect();
    serde_yaml::from_value(serde_yaml::Value::Mapping(mapping)).map_err(|e| e.to_string())
}
