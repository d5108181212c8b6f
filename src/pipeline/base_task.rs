// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// An outgoing edge: this task feeds `task_id` at input slot `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessorEdge {
    pub task_id: String,
    pub index: usize,
}

/// Identity and wiring of a task within one graph.
///
/// `predecessors[i]` is the task whose result arrives at input slot `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTask {
    pub id: String,
    pub predecessors: Vec<String>,
    pub successors: Vec<SuccessorEdge>,
}

impl BaseTask {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    pub fn input_count(&self) -> usize {
        self.predecessors.len()
    }

    pub fn is_source(&self) -> bool {
        self.predecessors.is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.successors.is_empty()
    }
}
