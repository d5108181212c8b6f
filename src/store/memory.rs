// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::errors::StoreError;
use crate::pipeline::{BaseTask, RunId, TaskResult, TaskRun, TaskRunId, TaskType};
use crate::traits::TaskRunStore;

/// Process-local TaskRun store.
///
/// Lock discipline: one `RwLock` guards the whole map and is never held
/// across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryTaskRunStore {
    task_runs: RwLock<HashMap<TaskRunId, TaskRun>>,
    lookups: AtomicUsize,
}

impl InMemoryTaskRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get_task_run` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.task_runs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_runs.read().is_empty()
    }

    /// Every TaskRun belonging to `run_id`, in no particular order.
    pub fn task_runs_for(&self, run_id: RunId) -> Vec<TaskRun> {
        self.task_runs
            .read()
            .values()
            .filter(|run| run.pipeline_run_id == run_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TaskRunStore for InMemoryTaskRunStore {
    async fn create_task_run(
        &self,
        run_id: RunId,
        task: &BaseTask,
        task_type: TaskType,
    ) -> Result<TaskRunId, StoreError> {
        let id = TaskRunId::new();
        let task_run = TaskRun {
            id,
            pipeline_run_id: run_id,
            task_id: task.id.clone(),
            task_type,
            predecessor_count: task.input_count(),
            result: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        };
        self.task_runs.write().insert(id, task_run);
        Ok(id)
    }

    async fn start_task_run(&self, id: TaskRunId) -> Result<TaskRun, StoreError> {
        let mut task_runs = self.task_runs.write();
        let task_run = task_runs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if task_run.is_complete() {
            return Err(StoreError::AlreadyCompleted(id));
        }
        if task_run.is_started() {
            return Err(StoreError::AlreadyStarted(id));
        }
        task_run.started_at = Some(Utc::now());
        Ok(task_run.clone())
    }

    async fn complete_task_run(&self, id: TaskRunId, result: TaskResult) -> Result<(), StoreError> {
        let mut task_runs = self.task_runs.write();
        let task_run = task_runs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if task_run.is_complete() {
            return Err(StoreError::AlreadyCompleted(id));
        }
        task_run.result = Some(result);
        task_run.finished_at = Some(Utc::now());
        Ok(())
    }

    async fn get_task_run(&self, id: TaskRunId) -> Result<TaskRun, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.task_runs
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }
}
