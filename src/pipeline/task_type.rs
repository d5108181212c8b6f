// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying the kind of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Literal,
    JsonParse,
    Multiply,
    Sum,
    Median,
    /// Synthetic sink; only the graph builder creates tasks of this type.
    Result,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Literal => "literal",
            TaskType::JsonParse => "json_parse",
            TaskType::Multiply => "multiply",
            TaskType::Sum => "sum",
            TaskType::Median => "median",
            TaskType::Result => "result",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
