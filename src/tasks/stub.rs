// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test-only tasks for exercising the runner.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;

use crate::pipeline::{RunId, TaskResult, TaskRun, TaskRunId, TaskType};
use crate::traits::Task;

/// A detached TaskRun record for calling `Task::run` directly.
pub fn task_run(task_id: &str, task_type: TaskType, predecessor_count: usize) -> TaskRun {
    TaskRun {
        id: TaskRunId::new(),
        pipeline_run_id: RunId::new(),
        task_id: task_id.to_string(),
        task_type,
        predecessor_count,
        result: None,
        created_at: Utc::now(),
        started_at: None,
        finished_at: None,
    }
}

/// Returns a fixed value and counts its invocations.
pub struct CountingTask {
    value: Value,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl CountingTask {
    pub fn new() -> Self {
        Self::returning(Value::Null)
    }

    pub fn returning(value: Value) -> Self {
        Self {
            value,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sleep for `delay` after counting the call.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared counter that outlives the task once it is moved into a graph.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Task for CountingTask {
    fn task_type(&self) -> TaskType {
        TaskType::Literal
    }

    async fn run(&self, _task_run: &TaskRun, _inputs: Vec<TaskResult>) -> TaskResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        TaskResult::ok(self.value.clone())
    }
}

/// Sleeps before returning a fixed result.
pub struct DelayedTask {
    delay: Duration,
    result: TaskResult,
}

impl DelayedTask {
    pub fn new(delay: Duration, result: TaskResult) -> Self {
        Self { delay, result }
    }
}

#[async_trait]
impl Task for DelayedTask {
    fn task_type(&self) -> TaskType {
        TaskType::Literal
    }

    async fn run(&self, _task_run: &TaskRun, _inputs: Vec<TaskResult>) -> TaskResult {
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

/// Always returns a data-level failure.
pub struct FailingTask {
    message: String,
}

impl FailingTask {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl Task for FailingTask {
    fn task_type(&self) -> TaskType {
        TaskType::Literal
    }

    async fn run(&self, _task_run: &TaskRun, _inputs: Vec<TaskResult>) -> TaskResult {
        TaskResult::error(self.message.clone())
    }
}

/// Panics inside `run`.
pub struct PanickingTask;

#[async_trait]
impl Task for PanickingTask {
    fn task_type(&self) -> TaskType {
        TaskType::Literal
    }

    async fn run(&self, _task_run: &TaskRun, _inputs: Vec<TaskResult>) -> TaskResult {
        panic!("simulated task panic")
    }
}

/// Records the inputs it receives and returns their values as an array.
pub struct RecordingTask {
    seen: Arc<Mutex<Vec<Vec<TaskResult>>>>,
}

impl RecordingTask {
    pub fn new() -> Self {
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn recorded(&self) -> Arc<Mutex<Vec<Vec<TaskResult>>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait]
impl Task for RecordingTask {
    fn task_type(&self) -> TaskType {
        TaskType::Sum
    }

    async fn run(&self, _task_run: &TaskRun, inputs: Vec<TaskResult>) -> TaskResult {
        let values = inputs.iter().map(|input| input.value.clone()).collect();
        self.seen.lock().push(inputs);
        TaskResult::ok(Value::Array(values))
    }
}

/// Signals when it starts, then waits to be released.
pub struct GatedTask {
    started: Arc<Notify>,
    release: Arc<Notify>,
    result: TaskResult,
}

impl GatedTask {
    pub fn new(result: TaskResult) -> Self {
        Self {
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            result,
        }
    }

    pub fn started(&self) -> Arc<Notify> {
        Arc::clone(&self.started)
    }

    pub fn release(&self) -> Arc<Notify> {
        Arc::clone(&self.release)
    }
}

#[async_trait]
impl Task for GatedTask {
    fn task_type(&self) -> TaskType {
        TaskType::Literal
    }

    async fn run(&self, _task_run: &TaskRun, _inputs: Vec<TaskResult>) -> TaskResult {
        self.started.notify_one();
        self.release.notified().await;
        self.result.clone()
    }
}
