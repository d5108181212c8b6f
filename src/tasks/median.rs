// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::TaskError;
use crate::pipeline::{TaskResult, TaskRun, TaskType};
use crate::tasks::{as_number, number_value};
use crate::traits::Task;

/// Median of its numeric inputs, tolerating a bounded number of faults.
///
/// An input is a fault when it carries an error or is not numeric. Without
/// an explicit `allowed_faults`, up to `(n - 1) / 2` of `n` inputs may fail,
/// so the median is always taken over a majority.
#[derive(Debug, Clone, Default)]
pub struct MedianTask {
    allowed_faults: Option<usize>,
}

impl MedianTask {
    pub fn new(allowed_faults: Option<usize>) -> Self {
        Self { allowed_faults }
    }

    fn median(&self, inputs: &[TaskResult]) -> Result<serde_json::Value, TaskError> {
        if inputs.is_empty() {
            return Err(TaskError::invalid_input("median requires at least 1 input"));
        }

        let allowed = self
            .allowed_faults
            .unwrap_or((inputs.len() - 1) / 2);

        let mut values: Vec<f64> = inputs
            .iter()
            .filter(|input| !input.is_error())
            .filter_map(|input| as_number(&input.value))
            .collect();

        let faults = inputs.len() - values.len();
        if faults > allowed || values.is_empty() {
            return Err(TaskError::Upstream(format!(
                "{} of {} inputs failed, {} allowed",
                faults,
                inputs.len(),
                allowed
            )));
        }

        values.sort_by(|a, b| a.total_cmp(b));
        let mid = values.len() / 2;
        let median = if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        };
        number_value(median)
    }
}

#[async_trait]
impl Task for MedianTask {
    fn task_type(&self) -> TaskType {
        TaskType::Median
    }

    async fn run(&self, _task_run: &TaskRun, inputs: Vec<TaskResult>) -> TaskResult {
        match self.median(&inputs) {
            Ok(value) => TaskResult::ok(value),
            Err(error) => TaskResult::failed(error),
        }
    }
}
