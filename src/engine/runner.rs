// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Event-driven pipeline runner.
//!
//! ## Execution Model
//!
//! Every TaskRun of a pipeline run gets its own async driver and an inbox
//! channel. A driver waits until all of its input slots are filled, takes a
//! permit from the runner-wide semaphore, invokes its task, persists the
//! result and only then delivers it to each successor's inbox at the slot the
//! successor declared. The run is complete when the result task's TaskRun
//! has a result.
//!
//! ## Failure Handling
//!
//! Data-level task failures are ordinary results and flow downstream.
//! Infrastructure failures (persistence, scheduling violations, panics under
//! [`PanicPolicy::FailRun`]) cancel the run: drivers that have not started
//! stop waiting, in-flight tasks finish but their results are dropped, and
//! the first error is returned. TaskRuns already completed stay as they are.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::config::RunnerConfig;
use crate::engine::run_state::TaskRunNode;
use crate::errors::{ExecutionError, PanicPolicy, SchedulingError, StoreError, TaskError};
use crate::graph::{Graph, GraphNode};
use crate::observability::messages::engine::{
    RunAdmitted, RunCancelled, RunCompleted, RunFailed, RunStarted,
};
use crate::observability::messages::task::{
    TaskCompleted, TaskPanicked, TaskResultDiscarded, TaskSkipped, TaskStarted, TaskTimedOut,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{FinalResult, PipelineRun, RunId, TaskResult, TaskRun, TaskRunId};
use crate::traits::TaskRunStore;

/// Runner-wide execution settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerOptions {
    /// Upper bound on concurrently executing `Task::run` calls across all runs.
    pub max_concurrency: usize,
    pub task_timeout: Option<Duration>,
    pub panic_policy: PanicPolicy,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self::from(&RunnerConfig::default())
    }
}

impl From<&RunnerConfig> for RunnerOptions {
    fn from(cfg: &RunnerConfig) -> Self {
        Self {
            max_concurrency: cfg.max_concurrency(),
            task_timeout: cfg.task_timeout(),
            panic_policy: cfg.panic_policy,
        }
    }
}

/// A completed pipeline run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub result: FinalResult,
    pub duration: Duration,
}

/// Executes pipeline runs against a shared [`TaskRunStore`].
///
/// Cloning a runner is cheap; clones share the store and the concurrency
/// limit.
#[derive(Clone)]
pub struct Runner {
    store: Arc<dyn TaskRunStore>,
    options: RunnerOptions,
    semaphore: Arc<Semaphore>,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("options", &self.options)
            .field("available_permits", &self.semaphore.available_permits())
            .finish()
    }
}

/// Handle to a run started with [`Runner::start`].
pub struct RunHandle {
    run: PipelineRun,
    cancellation: CancellationToken,
    join: JoinHandle<Result<RunOutcome, ExecutionError>>,
}

impl RunHandle {
    pub fn run_id(&self) -> RunId {
        self.run.id
    }

    pub fn pipeline_run(&self) -> &PipelineRun {
        &self.run
    }

    /// Stop admitting new TaskRuns. In-flight tasks finish; their results are dropped.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub async fn wait(self) -> Result<RunOutcome, ExecutionError> {
        self.join.await.map_err(|e| ExecutionError::Internal {
            message: format!("run driver failed: {}", e),
        })?
    }
}

/// Result delivered into a successor's input slot.
struct Delivery {
    index: usize,
    result: TaskResult,
}

/// Everything a node driver needs, shared by all drivers of one run.
struct RunContext {
    run_id: RunId,
    graph: Arc<Graph>,
    store: Arc<dyn TaskRunStore>,
    semaphore: Arc<Semaphore>,
    options: RunnerOptions,
    cancellation: CancellationToken,
    task_runs: HashMap<String, TaskRunId>,
    inboxes: HashMap<String, mpsc::UnboundedSender<Delivery>>,
}

impl Runner {
    pub fn new(store: Arc<dyn TaskRunStore>, options: RunnerOptions) -> Self {
        let permits = options.max_concurrency.max(1);
        Self {
            store,
            options,
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    pub fn store(&self) -> &Arc<dyn TaskRunStore> {
        &self.store
    }

    /// Create a new pipeline run with one pending TaskRun per task.
    pub async fn admit(&self, graph: &Graph) -> Result<PipelineRun, ExecutionError> {
        let run_id = RunId::new();
        let mut task_runs = HashMap::with_capacity(graph.len());

        for node in graph.topological_order() {
            let id = self
                .store
                .create_task_run(run_id, &node.base, node.task_type())
                .await
                .map_err(|source| ExecutionError::Admission { run_id, source })?;
            task_runs.insert(node.id().to_string(), id);
        }

        let result_task_run_id = task_runs
            .get(graph.result_task_id())
            .copied()
            .ok_or_else(|| ExecutionError::Internal {
                message: format!("graph has no task run for '{}'", graph.result_task_id()),
            })?;

        RunAdmitted {
            run_id,
            task_run_count: task_runs.len(),
        }
        .log();

        Ok(PipelineRun {
            id: run_id,
            task_runs,
            result_task_run_id,
            created_at: Utc::now(),
        })
    }

    /// Admit and execute a run to completion.
    pub async fn run(&self, graph: Arc<Graph>) -> Result<RunOutcome, ExecutionError> {
        let run = self.admit(&graph).await?;
        self.execute(&run, graph, CancellationToken::new()).await
    }

    /// Admit a run and execute it in the background.
    pub async fn start(&self, graph: Arc<Graph>) -> Result<RunHandle, ExecutionError> {
        let run = self.admit(&graph).await?;
        let cancellation = CancellationToken::new();

        let runner = self.clone();
        let driver_run = run.clone();
        let driver_cancellation = cancellation.clone();
        let join = tokio::spawn(async move {
            runner
                .execute(&driver_run, graph, driver_cancellation)
                .await
        });

        Ok(RunHandle {
            run,
            cancellation,
            join,
        })
    }

    /// Drive an admitted run until its result task completes, it is
    /// cancelled through `cancellation`, or an infrastructure error occurs.
    pub async fn execute(
        &self,
        run: &PipelineRun,
        graph: Arc<Graph>,
        cancellation: CancellationToken,
    ) -> Result<RunOutcome, ExecutionError> {
        let started = Instant::now();
        let run_token = cancellation.child_token();

        RunStarted {
            run_id: run.id,
            task_count: graph.len(),
            max_concurrency: self.options.max_concurrency,
        }
        .log();

        let mut inboxes = HashMap::with_capacity(graph.len());
        let mut receivers = Vec::with_capacity(graph.len());
        for node in graph.nodes() {
            let (sender, receiver) = mpsc::unbounded_channel();
            inboxes.insert(node.id().to_string(), sender);
            receivers.push((node.id().to_string(), receiver));
        }

        let ctx = Arc::new(RunContext {
            run_id: run.id,
            graph: Arc::clone(&graph),
            store: Arc::clone(&self.store),
            semaphore: Arc::clone(&self.semaphore),
            options: self.options.clone(),
            cancellation: run_token.clone(),
            task_runs: run.task_runs.clone(),
            inboxes,
        });

        let mut drivers = JoinSet::new();
        for (task_id, receiver) in receivers {
            drivers.spawn(drive_task_run(Arc::clone(&ctx), task_id, receiver));
        }

        let mut first_error = None;
        while let Some(joined) = drivers.join_next().await {
            let error = match joined {
                Ok(Ok(())) => continue,
                Ok(Err(error)) => error,
                Err(join_error) => ExecutionError::Internal {
                    message: format!("task driver failed: {}", join_error),
                },
            };
            run_token.cancel();
            first_error.get_or_insert(error);
        }

        if let Some(error) = first_error {
            RunFailed {
                run_id: run.id,
                error: &error,
            }
            .log();
            return Err(error);
        }

        match self.final_result(run).await? {
            Some(result) => {
                let duration = started.elapsed();
                RunCompleted {
                    run_id: run.id,
                    duration,
                    result_count: result.len(),
                    error_count: result.errors.iter().filter(|e| e.is_some()).count(),
                }
                .log();
                Ok(RunOutcome {
                    run_id: run.id,
                    result,
                    duration,
                })
            }
            None if run_token.is_cancelled() => {
                RunCancelled { run_id: run.id }.log();
                Err(ExecutionError::Cancelled { run_id: run.id })
            }
            None => Err(ExecutionError::Internal {
                message: format!("run {} stopped without a result", run.id),
            }),
        }
    }

    /// Whether the run is complete. A single point lookup of the result
    /// task's TaskRun, independent of the number of tasks.
    pub async fn is_run_complete(&self, run: &PipelineRun) -> Result<bool, ExecutionError> {
        Ok(self.result_task_run(run).await?.is_complete())
    }

    /// The run's positional values and errors, once its result task completed.
    pub async fn final_result(&self, run: &PipelineRun) -> Result<Option<FinalResult>, ExecutionError> {
        let task_run = self.result_task_run(run).await?;
        Ok(task_run.result.as_ref().and_then(TaskResult::collected))
    }

    async fn result_task_run(&self, run: &PipelineRun) -> Result<TaskRun, ExecutionError> {
        self.store
            .get_task_run(run.result_task_run_id)
            .await
            .map_err(|source| ExecutionError::CompletionLookup {
                run_id: run.id,
                source,
            })
    }
}

/// Own one TaskRun from `Pending` to `Complete`.
async fn drive_task_run(
    ctx: Arc<RunContext>,
    task_id: String,
    mut inbox: mpsc::UnboundedReceiver<Delivery>,
) -> Result<(), ExecutionError> {
    let node = ctx.graph.node(&task_id).ok_or_else(|| ExecutionError::Internal {
        message: format!("task '{}' is not part of the graph", task_id),
    })?;
    let task_run_id = ctx
        .task_runs
        .get(&task_id)
        .copied()
        .ok_or_else(|| ExecutionError::Internal {
            message: format!("task '{}' has no task run in run {}", task_id, ctx.run_id),
        })?;

    let mut state = TaskRunNode::new(task_id.as_str(), node.base.input_count());

    while !state.is_ready() {
        tokio::select! {
            biased;
            _ = ctx.cancellation.cancelled() => {
                skip(&ctx, &state);
                return Ok(());
            }
            delivery = inbox.recv() => match delivery {
                Some(Delivery { index, result }) => {
                    state.deliver(index, result)?;
                }
                None => {
                    return Err(ExecutionError::Internal {
                        message: format!("inbox of task '{}' closed", task_id),
                    });
                }
            }
        }
    }

    let _permit = tokio::select! {
        biased;
        _ = ctx.cancellation.cancelled() => {
            skip(&ctx, &state);
            return Ok(());
        }
        permit = ctx.semaphore.acquire() => permit.map_err(|_| ExecutionError::Internal {
            message: "runner semaphore closed".into(),
        })?,
    };

    // losing the claim means another driver owns this TaskRun
    let task_run = match ctx.store.start_task_run(task_run_id).await {
        Ok(task_run) => task_run,
        Err(StoreError::AlreadyStarted(_) | StoreError::AlreadyCompleted(_)) => {
            return Err(SchedulingError::AlreadyAdmitted { task_id }.into());
        }
        Err(source) => {
            return Err(ExecutionError::Persistence {
                run_id: ctx.run_id,
                task_id,
                source,
            });
        }
    };

    let inputs = state.admit()?;
    let task_type = node.task_type();
    TaskStarted {
        run_id: ctx.run_id,
        task_id: &task_id,
        task_type: task_type.as_str(),
        input_count: inputs.len(),
    }
    .log();

    let started = Instant::now();
    let result = invoke(&ctx, node, task_run, inputs).await?;
    state.complete()?;

    if ctx.cancellation.is_cancelled() {
        TaskResultDiscarded {
            run_id: ctx.run_id,
            task_id: &task_id,
        }
        .log();
        return Ok(());
    }

    // write, then signal
    ctx.store
        .complete_task_run(task_run_id, result.clone())
        .await
        .map_err(|source| ExecutionError::Persistence {
            run_id: ctx.run_id,
            task_id: task_id.clone(),
            source,
        })?;

    TaskCompleted {
        run_id: ctx.run_id,
        task_id: &task_id,
        task_type: task_type.as_str(),
        duration: started.elapsed(),
        errored: result.is_error(),
    }
    .log();

    for edge in &node.base.successors {
        if let Some(inbox) = ctx.inboxes.get(&edge.task_id) {
            // a closed inbox means the successor already stopped on cancellation
            let _ = inbox.send(Delivery {
                index: edge.index,
                result: result.clone(),
            });
        }
    }

    Ok(())
}

/// Run the task on its own tokio task so a panic is contained and reported
/// through the configured [`PanicPolicy`].
async fn invoke(
    ctx: &RunContext,
    node: &GraphNode,
    task_run: TaskRun,
    inputs: Vec<TaskResult>,
) -> Result<TaskResult, ExecutionError> {
    let task = Arc::clone(&node.task);
    let handle = tokio::spawn(async move { task.run(&task_run, inputs).await });

    let joined = match ctx.options.task_timeout {
        Some(limit) => {
            let abort = handle.abort_handle();
            match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    abort.abort();
                    TaskTimedOut {
                        run_id: ctx.run_id,
                        task_id: node.id(),
                        timeout: limit,
                    }
                    .log();
                    return Ok(TaskResult::failed(TaskError::Timeout {
                        millis: whole_millis(limit),
                    }));
                }
            }
        }
        None => handle.await,
    };

    match joined {
        Ok(result) => Ok(result),
        Err(join_error) if join_error.is_panic() => {
            let message = panic_message(join_error.into_panic());
            let fails_run = ctx.options.panic_policy == PanicPolicy::FailRun;
            TaskPanicked {
                run_id: ctx.run_id,
                task_id: node.id(),
                message: &message,
                fails_run,
            }
            .log();
            if fails_run {
                Err(ExecutionError::TaskPanicked {
                    run_id: ctx.run_id,
                    task_id: node.id().to_string(),
                    message,
                })
            } else {
                Ok(TaskResult::failed(TaskError::Panicked(message)))
            }
        }
        Err(join_error) => Err(ExecutionError::Internal {
            message: format!("task '{}' was aborted: {}", node.id(), join_error),
        }),
    }
}

/// Milliseconds in `duration`, saturating at `u64::MAX`.
fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn skip(ctx: &RunContext, state: &TaskRunNode) {
    TaskSkipped {
        run_id: ctx.run_id,
        task_id: state.task_id(),
        received: state.received(),
        expected: state.expected(),
    }
    .log();
}
