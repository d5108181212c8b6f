// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use super::{MultiError, TaskFactoryError};

/// Errors that can occur while validating a declared task graph
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The pipeline declares no tasks at all
    EmptyPipeline,
    /// Two tasks share the same id
    DuplicateTaskId {
        /// The duplicated task id
        task_id: String,
    },
    /// An authored task uses the id reserved for the synthetic sink
    ReservedTaskId {
        /// The offending task id
        task_id: String,
    },
    /// An authored task reports the Result type, which only the builder may insert
    DeclaredResultTask {
        /// The offending task id
        task_id: String,
    },
    /// A task references a predecessor that doesn't exist
    UnresolvedDependency {
        /// The task that has the unresolved dependency
        task_id: String,
        /// The dependency that couldn't be resolved
        missing_dependency: String,
    },
    /// The same predecessor is listed more than once for one task
    DuplicateInput {
        task_id: String,
        dependency: String,
    },
    /// An explicit input index falls outside `0..input_count`
    InvalidInputIndex {
        task_id: String,
        dependency: String,
        index: usize,
        input_count: usize,
    },
    /// Two inputs of one task claim the same explicit index
    DuplicateInputIndex { task_id: String, index: usize },
    /// A circular dependency was detected in the task graph
    CyclicDependency {
        /// The cycle path showing the circular dependency
        cycle: Vec<String>,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyPipeline => write!(f, "Pipeline declares no tasks"),
            ValidationError::DuplicateTaskId { task_id } => {
                write!(f, "Duplicate task ID: '{}'", task_id)
            }
            ValidationError::ReservedTaskId { task_id } => {
                write!(
                    f,
                    "Task ID '{}' is reserved for the pipeline result task",
                    task_id
                )
            }
            ValidationError::DeclaredResultTask { task_id } => {
                write!(
                    f,
                    "Task '{}' is declared as a result task; the result task is inserted automatically",
                    task_id
                )
            }
            ValidationError::UnresolvedDependency {
                task_id,
                missing_dependency,
            } => {
                write!(
                    f,
                    "Task '{}' depends on '{}' which does not exist",
                    task_id, missing_dependency
                )
            }
            ValidationError::DuplicateInput {
                task_id,
                dependency,
            } => {
                write!(
                    f,
                    "Task '{}' lists input '{}' more than once",
                    task_id, dependency
                )
            }
            ValidationError::InvalidInputIndex {
                task_id,
                dependency,
                index,
                input_count,
            } => {
                write!(
                    f,
                    "Task '{}' places input '{}' at index {} but only has {} inputs",
                    task_id, dependency, index, input_count
                )
            }
            ValidationError::DuplicateInputIndex { task_id, index } => {
                write!(
                    f,
                    "Task '{}' assigns more than one input to index {}",
                    task_id, index
                )
            }
            ValidationError::CyclicDependency { cycle } => {
                write!(f, "Cyclic dependency detected: {}", cycle.join(" -> "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Failures while turning a pipeline file into a runnable graph.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read pipeline file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pipeline definition: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to instantiate tasks: {0}")]
    Factory(MultiError<TaskFactoryError>),

    #[error("invalid task graph: {0}")]
    Validation(MultiError<ValidationError>),
}

impl From<MultiError<ValidationError>> for ConfigError {
    fn from(errors: MultiError<ValidationError>) -> Self {
        ConfigError::Validation(errors)
    }
}

impl From<MultiError<TaskFactoryError>> for ConfigError {
    fn from(errors: MultiError<TaskFactoryError>) -> Self {
        ConfigError::Factory(errors)
    }
}
