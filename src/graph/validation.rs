// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation of declared task graphs.
//!
//! # Validation Pipeline
//!
//! 1. **Declaration checks**: ids are unique, none uses the reserved result
//!    task id, no authored task claims the Result type
//! 2. **Input checks**: every input resolves to a declared task, no
//!    predecessor is listed twice, explicit indices are unique and in range
//! 3. **Cycle detection**: DFS with a recursion stack, reporting the path
//!
//! Every stage always runs and every failure is collected. Cycle detection
//! ignores inputs that do not resolve and, for duplicated ids, follows the
//! first declaration.
//!
//! ## Cycle Detection Algorithm
//! Uses **Depth-First Search (DFS) with recursion stack**:
//! - **Time Complexity**: O(V + E)
//! - **Detection Method**: a back edge to a node on the current path
//! - **Reporting**: every cycle that shares no task with one already
//!   reported, so independent cycles each get their own error
//!
//! Roots and neighbours are visited in declaration order, so the same
//! declarations always report the same cycle.

use std::collections::{HashMap, HashSet};

use crate::config::consts::RESULT_TASK_ID;
use crate::errors::{ErrorAccumulator, MultiError, ValidationError};
use crate::graph::TaskDeclaration;
use crate::observability::messages::validation::{
    CyclicDependencyDetected, UnresolvedDependency,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::TaskType;

/// Validate a declaration set, returning every problem found.
///
/// # Examples
///
/// ```rust
/// use pipeline_core::graph::{validate_declarations, TaskDeclaration, InputRef};
/// use pipeline_core::tasks::LiteralTask;
/// use std::sync::Arc;
///
/// let declarations = vec![
///     TaskDeclaration::new("a", Arc::new(LiteralTask::new(1.into())), vec![]),
///     TaskDeclaration::new("b", Arc::new(LiteralTask::new(2.into())), vec![InputRef::from("missing")]),
/// ];
///
/// let errors = validate_declarations(&declarations).unwrap_err();
/// assert_eq!(errors.len(), 1);
/// ```
pub fn validate_declarations(
    declarations: &[TaskDeclaration],
) -> Result<(), MultiError<ValidationError>> {
    let mut errors = ErrorAccumulator::new();

    if declarations.is_empty() {
        errors.push(ValidationError::EmptyPipeline);
        return errors.finish();
    }

    errors.extend(validate_task_ids(declarations));
    errors.extend(validate_inputs(declarations));

    for cycle in find_cycles(declarations) {
        CyclicDependencyDetected { cycle: &cycle }.log();
        errors.push(ValidationError::CyclicDependency { cycle });
    }

    errors.finish()
}

fn validate_task_ids(declarations: &[TaskDeclaration]) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for declaration in declarations {
        if !seen.insert(declaration.id.as_str()) {
            errors.push(ValidationError::DuplicateTaskId {
                task_id: declaration.id.clone(),
            });
        }
        if declaration.id == RESULT_TASK_ID {
            errors.push(ValidationError::ReservedTaskId {
                task_id: declaration.id.clone(),
            });
        }
        if declaration.task.task_type() == TaskType::Result {
            errors.push(ValidationError::DeclaredResultTask {
                task_id: declaration.id.clone(),
            });
        }
    }

    errors
}

fn validate_inputs(declarations: &[TaskDeclaration]) -> Vec<ValidationError> {
    let task_ids: HashSet<&str> = declarations.iter().map(|d| d.id.as_str()).collect();
    let mut errors = Vec::new();

    for declaration in declarations {
        let input_count = declaration.inputs.len();
        let mut listed = HashSet::new();
        let mut claimed_indices = HashSet::new();

        for input in &declaration.inputs {
            if !task_ids.contains(input.task.as_str()) {
                UnresolvedDependency {
                    task_id: &declaration.id,
                    missing_dependency: &input.task,
                }
                .log();
                errors.push(ValidationError::UnresolvedDependency {
                    task_id: declaration.id.clone(),
                    missing_dependency: input.task.clone(),
                });
            }

            if !listed.insert(input.task.as_str()) {
                errors.push(ValidationError::DuplicateInput {
                    task_id: declaration.id.clone(),
                    dependency: input.task.clone(),
                });
            }

            if let Some(index) = input.index {
                if index >= input_count {
                    errors.push(ValidationError::InvalidInputIndex {
                        task_id: declaration.id.clone(),
                        dependency: input.task.clone(),
                        index,
                        input_count,
                    });
                } else if !claimed_indices.insert(index) {
                    errors.push(ValidationError::DuplicateInputIndex {
                        task_id: declaration.id.clone(),
                        index,
                    });
                }
            }
        }
    }

    errors
}

/// Order a declaration's inputs by slot.
///
/// Explicitly indexed inputs take their slot; the rest fill the free slots
/// in the order they were listed. Only meaningful for declarations that
/// passed [`validate_declarations`].
pub(crate) fn resolve_input_slots(declaration: &TaskDeclaration) -> Vec<String> {
    let mut slots: Vec<Option<String>> = vec![None; declaration.inputs.len()];

    for input in &declaration.inputs {
        if let Some(index) = input.index {
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(input.task.clone());
            }
        }
    }

    let mut free = slots.iter_mut().filter(|slot| slot.is_none());
    for input in declaration.inputs.iter().filter(|input| input.index.is_none()) {
        if let Some(slot) = free.next() {
            *slot = Some(input.task.clone());
        }
    }

    slots.into_iter().flatten().collect()
}

/// Find every task-disjoint cycle, each returned as the path from its first
/// node back to itself.
fn find_cycles(declarations: &[TaskDeclaration]) -> Vec<Vec<String>> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    for (i, declaration) in declarations.iter().enumerate() {
        position.entry(declaration.id.as_str()).or_insert(i);
    }

    // dependency -> dependents, both as declaration positions
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); declarations.len()];
    for (i, declaration) in declarations.iter().enumerate() {
        for input in &declaration.inputs {
            if let Some(&dependency) = position.get(input.task.as_str()) {
                dependents[dependency].push(i);
            }
        }
    }

    let mut search = CycleSearch {
        dependents: &dependents,
        visited: vec![false; declarations.len()],
        on_stack: vec![false; declarations.len()],
        reported: vec![false; declarations.len()],
        path: Vec::new(),
        cycles: Vec::new(),
    };

    for root in 0..declarations.len() {
        if !search.visited[root] {
            search.dfs_cycle_detection(root);
        }
    }

    search
        .cycles
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|i| declarations[i].id.clone()).collect())
        .collect()
}

struct CycleSearch<'a> {
    dependents: &'a [Vec<usize>],
    visited: Vec<bool>,
    on_stack: Vec<bool>,
    reported: Vec<bool>,
    path: Vec<usize>,
    cycles: Vec<Vec<usize>>,
}

impl CycleSearch<'_> {
    fn dfs_cycle_detection(&mut self, node: usize) {
        self.visited[node] = true;
        self.on_stack[node] = true;
        self.path.push(node);

        let dependents = self.dependents;
        for &neighbor in &dependents[node] {
            if self.on_stack[neighbor] {
                self.record_cycle(neighbor);
            } else if !self.visited[neighbor] {
                self.dfs_cycle_detection(neighbor);
            }
        }

        self.on_stack[node] = false;
        self.path.pop();
    }

    /// Record the back edge to `head` unless the loop overlaps a reported one.
    fn record_cycle(&mut self, head: usize) {
        let start = self.path.iter().position(|&n| n == head).unwrap_or(0);
        let members = &self.path[start..];
        if members.iter().any(|&n| self.reported[n]) {
            return;
        }
        for &n in members {
            self.reported[n] = true;
        }
        let mut cycle = members.to_vec();
        cycle.push(head);
        self.cycles.push(cycle);
    }
}
