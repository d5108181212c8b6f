// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-TaskRun scheduling state.
//!
//! Each TaskRun in a running pipeline is owned by exactly one node driver.
//! The driver moves it through `Pending -> Ready -> Running -> Complete`;
//! every transition is checked here, so a TaskRun can be admitted at most
//! once and only after its last input slot is filled.

use crate::errors::SchedulingError;
use crate::pipeline::{TaskResult, TaskRunStatus};

/// AND-join over a fixed number of positional input slots.
#[derive(Debug)]
pub struct InputSlots {
    slots: Vec<Option<TaskResult>>,
    filled: usize,
}

impl InputSlots {
    pub fn new(expected: usize) -> Self {
        Self {
            slots: vec![None; expected],
            filled: 0,
        }
    }

    pub fn expected(&self) -> usize {
        self.slots.len()
    }

    pub fn received(&self) -> usize {
        self.filled
    }

    pub fn is_complete(&self) -> bool {
        self.filled == self.slots.len()
    }

    fn fill(&mut self, task_id: &str, index: usize, result: TaskResult) -> Result<(), SchedulingError> {
        let expected = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| SchedulingError::InputOutOfRange {
                task_id: task_id.to_string(),
                index,
                expected,
            })?;
        if slot.is_some() {
            return Err(SchedulingError::DuplicateInput {
                task_id: task_id.to_string(),
                index,
            });
        }
        *slot = Some(result);
        self.filled += 1;
        Ok(())
    }

    fn take(&mut self) -> Vec<TaskResult> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }
}

/// Scheduling state machine for one TaskRun.
#[derive(Debug)]
pub struct TaskRunNode {
    task_id: String,
    status: TaskRunStatus,
    inputs: InputSlots,
}

impl TaskRunNode {
    /// A node with no inputs starts out `Ready`.
    pub fn new(task_id: impl Into<String>, input_count: usize) -> Self {
        let status = if input_count == 0 {
            TaskRunStatus::Ready
        } else {
            TaskRunStatus::Pending
        };
        Self {
            task_id: task_id.into(),
            status,
            inputs: InputSlots::new(input_count),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn status(&self) -> TaskRunStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == TaskRunStatus::Ready
    }

    pub fn received(&self) -> usize {
        self.inputs.received()
    }

    pub fn expected(&self) -> usize {
        self.inputs.expected()
    }

    /// Fill input slot `index`. Returns the status after delivery.
    pub fn deliver(&mut self, index: usize, result: TaskResult) -> Result<TaskRunStatus, SchedulingError> {
        if self.status != TaskRunStatus::Pending {
            return Err(SchedulingError::DuplicateInput {
                task_id: self.task_id.clone(),
                index,
            });
        }
        self.inputs.fill(&self.task_id, index, result)?;
        if self.inputs.is_complete() {
            self.status = TaskRunStatus::Ready;
        }
        Ok(self.status)
    }

    /// Claim the TaskRun for execution, handing over its inputs in slot order.
    pub fn admit(&mut self) -> Result<Vec<TaskResult>, SchedulingError> {
        match self.status {
            TaskRunStatus::Ready => {
                self.status = TaskRunStatus::Running;
                Ok(self.inputs.take())
            }
            TaskRunStatus::Pending => Err(SchedulingError::NotReady {
                task_id: self.task_id.clone(),
                received: self.inputs.received(),
                expected: self.inputs.expected(),
            }),
            TaskRunStatus::Running | TaskRunStatus::Complete => {
                Err(SchedulingError::AlreadyAdmitted {
                    task_id: self.task_id.clone(),
                })
            }
        }
    }

    pub fn complete(&mut self) -> Result<(), SchedulingError> {
        if self.status != TaskRunStatus::Running {
            return Err(SchedulingError::InvalidCompletion {
                task_id: self.task_id.clone(),
            });
        }
        self.status = TaskRunStatus::Complete;
        Ok(())
    }
}
