// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::pipeline::{BaseTask, SuccessorEdge, TaskType};
use crate::traits::Task;

/// Reference to a predecessor from a task declaration.
///
/// `index` pins the predecessor to a specific input slot. Unindexed inputs
/// fill the remaining slots in the order they are listed.
///
/// In YAML an input is either a bare task id or a mapping:
/// ```yaml
/// inputs: [fetch_a, { task: fetch_b, index: 0 }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawInputRef")]
pub struct InputRef {
    pub task: String,
    pub index: Option<usize>,
}

impl InputRef {
    pub fn at(task: impl Into<String>, index: usize) -> Self {
        Self {
            task: task.into(),
            index: Some(index),
        }
    }
}

impl From<&str> for InputRef {
    fn from(task: &str) -> Self {
        Self {
            task: task.to_string(),
            index: None,
        }
    }
}

impl From<String> for InputRef {
    fn from(task: String) -> Self {
        Self { task, index: None }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInputRef {
    Name(String),
    Explicit { task: String, index: Option<usize> },
}

impl From<RawInputRef> for InputRef {
    fn from(raw: RawInputRef) -> Self {
        match raw {
            RawInputRef::Name(task) => InputRef { task, index: None },
            RawInputRef::Explicit { task, index } => InputRef { task, index },
        }
    }
}

/// One authored task before validation.
#[derive(Clone)]
pub struct TaskDeclaration {
    pub id: String,
    pub task: Arc<dyn Task>,
    pub inputs: Vec<InputRef>,
}

impl TaskDeclaration {
    pub fn new(id: impl Into<String>, task: Arc<dyn Task>, inputs: Vec<InputRef>) -> Self {
        Self {
            id: id.into(),
            task,
            inputs,
        }
    }
}

impl fmt::Debug for TaskDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDeclaration")
            .field("id", &self.id)
            .field("task_type", &self.task.task_type())
            .field("inputs", &self.inputs)
            .finish()
    }
}

/// A task and its wiring inside a built graph.
#[derive(Clone)]
pub struct GraphNode {
    pub base: BaseTask,
    pub task: Arc<dyn Task>,
}

impl GraphNode {
    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn task_type(&self) -> TaskType {
        self.task.task_type()
    }
}

impl fmt::Debug for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphNode")
            .field("base", &self.base)
            .field("task_type", &self.task.task_type())
            .finish()
    }
}

/// A validated, immutable task graph ending in exactly one result task.
///
/// Built by [`GraphBuilder`](super::GraphBuilder). Share it as `Arc<Graph>`;
/// nothing about a graph changes after construction, so concurrent runs
/// read it without locking.
pub struct Graph {
    pub(crate) nodes: Vec<GraphNode>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) topological_order: Vec<usize>,
    pub(crate) result_index: usize,
}

impl Graph {
    /// Number of tasks including the result task.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Tasks in declaration order, result task last.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    pub fn result_node(&self) -> &GraphNode {
        &self.nodes[self.result_index]
    }

    pub fn result_task_id(&self) -> &str {
        self.result_node().id()
    }

    /// Tasks with no successors. After construction this is only the result task.
    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.base.is_terminal())
            .map(GraphNode::id)
            .collect()
    }

    /// The authored terminal tasks, in the order they feed the result task.
    pub fn terminals(&self) -> &[String] {
        &self.result_node().base.predecessors
    }

    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.base.is_source())
            .map(GraphNode::id)
            .collect()
    }

    /// Every task such that each appears after all of its predecessors.
    pub fn topological_order(&self) -> impl Iterator<Item = &GraphNode> {
        self.topological_order.iter().map(|&i| &self.nodes[i])
    }

    pub fn predecessors_of(&self, id: &str) -> Option<&[String]> {
        self.node(id).map(|node| node.base.predecessors.as_slice())
    }

    pub fn successors_of(&self, id: &str) -> Option<&[SuccessorEdge]> {
        self.node(id).map(|node| node.base.successors.as_slice())
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("task_count", &self.nodes.len())
            .field("task_ids", &self.nodes.iter().map(GraphNode::id).collect::<Vec<_>>())
            .field("result_task_id", &self.result_task_id())
            .finish()
    }
}
