// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::config::consts::RESULT_TASK_ID;
use crate::errors::{MultiError, ValidationError};
use crate::graph::validation::{resolve_input_slots, validate_declarations};
use crate::graph::{Graph, GraphNode, InputRef, TaskDeclaration};
use crate::observability::messages::validation::{GraphBuilt, ValidationFailed};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{BaseTask, SuccessorEdge};
use crate::tasks::ResultTask;
use crate::traits::Task;

/// Collects task declarations and turns them into a [`Graph`].
///
/// `build` validates the declarations, wires predecessor slots and
/// successor edges, and connects every terminal task to a synthetic result
/// task with id [`RESULT_TASK_ID`]. Terminals feed the result task in the
/// order they were declared.
///
/// # Example
/// ```
/// use pipeline_core::graph::GraphBuilder;
/// use pipeline_core::tasks::{LiteralTask, MultiplyTask};
/// use std::sync::Arc;
///
/// let graph = GraphBuilder::new()
///     .source("price", Arc::new(LiteralTask::new(2.into())))
///     .task("scaled", Arc::new(MultiplyTask::new(10.0)), ["price"])
///     .build()
///     .unwrap();
///
/// assert_eq!(graph.terminals(), &["scaled".to_string()]);
/// assert_eq!(graph.sinks(), vec!["__result__"]);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    declarations: Vec<TaskDeclaration>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a task fed by `inputs`.
    pub fn task<I, R>(mut self, id: impl Into<String>, task: Arc<dyn Task>, inputs: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<InputRef>,
    {
        let inputs = inputs.into_iter().map(Into::into).collect();
        self.declarations
            .push(TaskDeclaration::new(id, task, inputs));
        self
    }

    /// Declare a task with no inputs.
    pub fn source(self, id: impl Into<String>, task: Arc<dyn Task>) -> Self {
        self.task(id, task, Vec::<InputRef>::new())
    }

    pub fn push(mut self, declaration: TaskDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn declarations(&self) -> &[TaskDeclaration] {
        &self.declarations
    }

    pub fn build(self) -> Result<Graph, MultiError<ValidationError>> {
        if let Err(errors) = validate_declarations(&self.declarations) {
            ValidationFailed {
                task_count: self.declarations.len(),
                error_count: errors.len(),
            }
            .log();
            return Err(errors);
        }

        let mut nodes: Vec<GraphNode> = self
            .declarations
            .iter()
            .map(|declaration| GraphNode {
                base: BaseTask {
                    id: declaration.id.clone(),
                    predecessors: resolve_input_slots(declaration),
                    successors: Vec::new(),
                },
                task: Arc::clone(&declaration.task),
            })
            .collect();

        let mut index: HashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.base.id.clone(), i))
            .collect();

        // successor edges, in declaration order of the successor
        for successor in 0..nodes.len() {
            let edges: Vec<(usize, SuccessorEdge)> = nodes[successor]
                .base
                .predecessors
                .iter()
                .enumerate()
                .filter_map(|(slot, predecessor)| {
                    index.get(predecessor).map(|&p| {
                        (
                            p,
                            SuccessorEdge {
                                task_id: nodes[successor].base.id.clone(),
                                index: slot,
                            },
                        )
                    })
                })
                .collect();
            for (predecessor, edge) in edges {
                nodes[predecessor].base.successors.push(edge);
            }
        }

        let terminals: Vec<String> = nodes
            .iter()
            .filter(|node| node.base.is_terminal())
            .map(|node| node.base.id.clone())
            .collect();

        let result_index = nodes.len();
        for (slot, terminal) in terminals.iter().enumerate() {
            if let Some(&i) = index.get(terminal) {
                nodes[i].base.successors.push(SuccessorEdge {
                    task_id: RESULT_TASK_ID.to_string(),
                    index: slot,
                });
            }
        }
        nodes.push(GraphNode {
            base: BaseTask {
                id: RESULT_TASK_ID.to_string(),
                predecessors: terminals.clone(),
                successors: Vec::new(),
            },
            task: Arc::new(ResultTask),
        });
        index.insert(RESULT_TASK_ID.to_string(), result_index);

        let topological_order = topological_sort(&nodes, &index);

        GraphBuilt {
            task_count: nodes.len(),
            terminal_tasks: &terminals,
            result_task_id: RESULT_TASK_ID,
        }
        .log();

        Ok(Graph {
            nodes,
            index,
            topological_order,
            result_index,
        })
    }
}

/// Kahn's algorithm; ties are broken by declaration order.
fn topological_sort(nodes: &[GraphNode], index: &HashMap<String, usize>) -> Vec<usize> {
    let mut in_degree: Vec<usize> = nodes.iter().map(|n| n.base.input_count()).collect();
    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(current) = queue.pop_front() {
        order.push(current);
        for edge in &nodes[current].base.successors {
            if let Some(&successor) = index.get(&edge.task_id) {
                in_degree[successor] -= 1;
                if in_degree[successor] == 0 {
                    queue.push_back(successor);
                }
            }
        }
    }

    order
}
