// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TaskError;

/// The outcome of exactly one TaskRun.
///
/// `value` is `Value::Null` when the task produced nothing. A result is
/// written once and never mutated afterwards; successors receive clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResultError>,
}

/// The error half of a [`TaskResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultError {
    /// A single task failed.
    Task(TaskError),
    /// Positional errors gathered by the result task, one per input, each
    /// kept exactly as the input carried it.
    Collected(Vec<Option<ResultError>>),
}

impl ResultError {
    /// The first concrete cause carried by this error, if any.
    pub fn first_cause(&self) -> Option<&TaskError> {
        match self {
            ResultError::Task(error) => Some(error),
            ResultError::Collected(errors) => errors
                .iter()
                .flatten()
                .find_map(ResultError::first_cause),
        }
    }
}

impl std::fmt::Display for ResultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultError::Task(error) => write!(f, "{}", error),
            ResultError::Collected(errors) => {
                let failed = errors.iter().filter(|e| e.is_some()).count();
                write!(f, "{} of {} results failed", failed, errors.len())
            }
        }
    }
}

impl TaskResult {
    pub fn ok(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            error: None,
        }
    }

    pub fn failed(error: TaskError) -> Self {
        Self {
            value: Value::Null,
            error: Some(ResultError::Task(error)),
        }
    }

    /// Shorthand for `TaskResult::failed(TaskError::Failed(message))`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::failed(TaskError::failed(message))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The single task error this result carries, flattening collections to
    /// their first cause.
    pub fn task_error(&self) -> Option<&TaskError> {
        self.error.as_ref().and_then(ResultError::first_cause)
    }

    /// Typed view of a result task's output. `None` for any other shape.
    pub fn collected(&self) -> Option<FinalResult> {
        let values = self.value.as_array()?;
        let errors = match &self.error {
            Some(ResultError::Collected(errors)) => errors.clone(),
            _ => return None,
        };
        if values.len() != errors.len() {
            return None;
        }
        Some(FinalResult {
            values: values.clone(),
            errors,
        })
    }
}

/// Positional values and errors of a finished pipeline run.
///
/// `values[i]` and `errors[i]` both belong to the i-th terminal task in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    pub values: Vec<Value>,
    pub errors: Vec<Option<ResultError>>,
}

impl FinalResult {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Option::is_some)
    }

    pub fn is_fully_successful(&self) -> bool {
        !self.has_errors()
    }

    /// First concrete cause of the error at position `index`.
    pub fn task_error(&self, index: usize) -> Option<&TaskError> {
        self.errors.get(index)?.as_ref()?.first_cause()
    }
}
