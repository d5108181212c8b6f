// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end runner tests against the in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::engine::{Runner, RunnerOptions};
use crate::errors::{ExecutionError, PanicPolicy, SchedulingError, StoreError, TaskError};
use crate::graph::{Graph, GraphBuilder, InputRef};
use crate::pipeline::{BaseTask, ResultError, RunId, TaskResult, TaskRun, TaskRunId, TaskType};
use crate::store::InMemoryTaskRunStore;
use crate::tasks::stub::{
    CountingTask, DelayedTask, FailingTask, GatedTask, PanickingTask, RecordingTask,
};
use crate::tasks::{LiteralTask, MedianTask};
use crate::traits::{Task, TaskRunStore};

fn runner_with(store: Arc<dyn TaskRunStore>, options: RunnerOptions) -> Runner {
    Runner::new(store, options)
}

fn options(max_concurrency: usize) -> RunnerOptions {
    RunnerOptions {
        max_concurrency,
        ..RunnerOptions::default()
    }
}

/// Store that refuses to persist the result of one task.
struct FailingCompletionStore {
    inner: InMemoryTaskRunStore,
    fail_task: String,
}

#[async_trait]
impl TaskRunStore for FailingCompletionStore {
    async fn create_task_run(
        &self,
        run_id: RunId,
        task: &BaseTask,
        task_type: TaskType,
    ) -> Result<TaskRunId, StoreError> {
        self.inner.create_task_run(run_id, task, task_type).await
    }

    async fn start_task_run(&self, id: TaskRunId) -> Result<TaskRun, StoreError> {
        self.inner.start_task_run(id).await
    }

    async fn complete_task_run(&self, id: TaskRunId, result: TaskResult) -> Result<(), StoreError> {
        let task_run = self.inner.get_task_run(id).await?;
        if task_run.task_id == self.fail_task {
            return Err(StoreError::Backend("disk full".into()));
        }
        self.inner.complete_task_run(id, result).await
    }

    async fn get_task_run(&self, id: TaskRunId) -> Result<TaskRun, StoreError> {
        self.inner.get_task_run(id).await
    }
}

/// Tracks the highest number of simultaneously running instances.
struct ConcurrencyGauge {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

#[async_trait]
impl Task for ConcurrencyGauge {
    fn task_type(&self) -> TaskType {
        TaskType::Literal
    }

    async fn run(&self, _task_run: &TaskRun, _inputs: Vec<TaskResult>) -> TaskResult {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        TaskResult::ok(Value::Null)
    }
}

#[tokio::test]
async fn test_single_task_pipeline() {
    let graph = Arc::new(
        GraphBuilder::new()
            .source("answer", Arc::new(LiteralTask::new(json!(42))))
            .build()
            .unwrap(),
    );
    let runner = Runner::new(Arc::new(InMemoryTaskRunStore::new()), options(2));

    let outcome = runner.run(graph).await.unwrap();

    assert_eq!(outcome.result.values, vec![json!(42)]);
    assert_eq!(outcome.result.errors, vec![None]);
    assert!(outcome.result.is_fully_successful());
}

#[tokio::test]
async fn test_inputs_follow_declared_order_not_completion_order() {
    for (a_delay, b_delay) in [(50, 0), (0, 50)] {
        let recorder = RecordingTask::new();
        let recorded = recorder.recorded();

        let graph = Arc::new(
            GraphBuilder::new()
                .source(
                    "a",
                    Arc::new(DelayedTask::new(
                        Duration::from_millis(a_delay),
                        TaskResult::ok(json!(5)),
                    )),
                )
                .source(
                    "b",
                    Arc::new(DelayedTask::new(
                        Duration::from_millis(b_delay),
                        TaskResult::error("timeout"),
                    )),
                )
                .task("c", Arc::new(recorder), ["a", "b"])
                .build()
                .unwrap(),
        );
        let runner = Runner::new(Arc::new(InMemoryTaskRunStore::new()), options(4));

        let outcome = runner.run(graph).await.unwrap();

        let seen = recorded.lock().clone();
        assert_eq!(seen.len(), 1, "c must run exactly once");
        assert_eq!(
            seen[0],
            vec![TaskResult::ok(json!(5)), TaskResult::error("timeout")]
        );
        assert_eq!(outcome.result.values, vec![json!([5, null])]);
    }
}

#[tokio::test]
async fn test_every_task_runs_exactly_once_in_a_diamond() {
    let tasks: Vec<CountingTask> = (0..4).map(|_| CountingTask::returning(json!(1))).collect();
    let counters: Vec<_> = tasks.iter().map(CountingTask::counter).collect();
    let mut tasks = tasks.into_iter();
    let mut next = || -> Arc<dyn Task> { Arc::new(tasks.next().unwrap()) };

    let graph = Arc::new(
        GraphBuilder::new()
            .source("top", next())
            .task("left", next(), ["top"])
            .task("right", next(), ["top"])
            .task("bottom", next(), ["left", "right"])
            .build()
            .unwrap(),
    );
    let runner = Runner::new(Arc::new(InMemoryTaskRunStore::new()), options(4));

    runner.run(graph).await.unwrap();

    for counter in counters {
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn test_branch_errors_reach_the_final_result_positionally() {
    let graph = Arc::new(
        GraphBuilder::new()
            .source("good", Arc::new(LiteralTask::new(json!("101.5"))))
            .source("bad", Arc::new(FailingTask::new("connection refused")))
            .build()
            .unwrap(),
    );
    let runner = Runner::new(Arc::new(InMemoryTaskRunStore::new()), options(2));

    let outcome = runner.run(graph).await.unwrap();

    assert_eq!(outcome.result.values, vec![json!("101.5"), Value::Null]);
    assert_eq!(
        outcome.result.errors,
        vec![None, Some(ResultError::Task(TaskError::failed("connection refused")))]
    );
    assert!(outcome.result.has_errors());
}

#[tokio::test]
async fn test_median_tolerates_a_failed_feed() {
    let graph = Arc::new(
        GraphBuilder::new()
            .source("feed_a", Arc::new(LiteralTask::new(json!(10))))
            .source("feed_b", Arc::new(FailingTask::new("timeout")))
            .source("feed_c", Arc::new(LiteralTask::new(json!("20"))))
            .task(
                "median",
                Arc::new(MedianTask::default()),
                ["feed_a", "feed_b", "feed_c"],
            )
            .build()
            .unwrap(),
    );
    let runner = Runner::new(Arc::new(InMemoryTaskRunStore::new()), options(4));

    let outcome = runner.run(graph).await.unwrap();

    assert_eq!(outcome.result.values, vec![json!(15.0)]);
    assert!(outcome.result.is_fully_successful());
}

#[tokio::test]
async fn test_completion_check_is_one_point_lookup_regardless_of_size() {
    for width in [1usize, 25] {
        let mut builder = GraphBuilder::new();
        for i in 0..width {
            builder = builder.source(format!("t{}", i), Arc::new(CountingTask::new()));
        }
        let graph = Arc::new(builder.build().unwrap());

        let store = Arc::new(InMemoryTaskRunStore::new());
        let runner = Runner::new(store.clone(), options(4));
        let run = runner.admit(&graph).await.unwrap();

        let before = store.lookup_count();
        assert!(!runner.is_run_complete(&run).await.unwrap());
        assert_eq!(store.lookup_count() - before, 1);

        runner
            .execute(&run, graph, CancellationToken::new())
            .await
            .unwrap();

        let before = store.lookup_count();
        assert!(runner.is_run_complete(&run).await.unwrap());
        assert_eq!(store.lookup_count() - before, 1);
    }
}

#[tokio::test]
async fn test_executing_a_finished_run_again_invokes_nothing() {
    let source = CountingTask::returning(json!(1));
    let source_calls = source.counter();
    let next = CountingTask::returning(json!(2));
    let next_calls = next.counter();
    let graph = Arc::new(
        GraphBuilder::new()
            .source("a", Arc::new(source))
            .task("b", Arc::new(next), ["a"])
            .build()
            .unwrap(),
    );
    let runner = Runner::new(Arc::new(InMemoryTaskRunStore::new()), options(2));
    let run = runner.admit(&graph).await.unwrap();

    runner
        .execute(&run, Arc::clone(&graph), CancellationToken::new())
        .await
        .unwrap();
    let second = runner
        .execute(&run, graph, CancellationToken::new())
        .await;

    assert!(matches!(
        second,
        Err(ExecutionError::Scheduling(SchedulingError::AlreadyAdmitted { ref task_id })) if task_id == "a"
    ));
    assert_eq!(source_calls.load(Ordering::SeqCst), 1);
    assert_eq!(next_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        runner.final_result(&run).await.unwrap().map(|r| r.values),
        Some(vec![json!(2)])
    );
}

#[tokio::test]
async fn test_concurrent_executions_of_one_run_invoke_each_task_once() {
    let source = CountingTask::returning(json!(1)).delayed(Duration::from_millis(50));
    let source_calls = source.counter();
    let next = CountingTask::returning(json!(2));
    let next_calls = next.counter();
    let graph = Arc::new(
        GraphBuilder::new()
            .source("src", Arc::new(source))
            .task("next", Arc::new(next), ["src"])
            .build()
            .unwrap(),
    );
    let runner = Runner::new(Arc::new(InMemoryTaskRunStore::new()), options(4));
    let run = runner.admit(&graph).await.unwrap();

    let (first, second) = tokio::join!(
        runner.execute(&run, Arc::clone(&graph), CancellationToken::new()),
        runner.execute(&run, Arc::clone(&graph), CancellationToken::new()),
    );

    let (winner, loser) = if first.is_ok() { (first, second) } else { (second, first) };
    assert_eq!(winner.unwrap().result.values, vec![json!(2)]);
    assert!(matches!(
        loser,
        Err(ExecutionError::Scheduling(SchedulingError::AlreadyAdmitted { ref task_id })) if task_id == "src"
    ));
    assert_eq!(source_calls.load(Ordering::SeqCst), 1);
    assert_eq!(next_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_admission_creates_one_task_run_per_task() {
    let graph = GraphBuilder::new()
        .source("a", Arc::new(CountingTask::new()))
        .task("b", Arc::new(CountingTask::new()), ["a"])
        .build()
        .unwrap();
    let store = Arc::new(InMemoryTaskRunStore::new());
    let runner = Runner::new(store.clone(), options(1));

    let run = runner.admit(&graph).await.unwrap();

    assert_eq!(run.task_runs.len(), 3);
    assert_eq!(run.task_run_id(graph.result_task_id()), Some(run.result_task_run_id));
    let result_run = store.get_task_run(run.result_task_run_id).await.unwrap();
    assert_eq!(result_run.task_type, TaskType::Result);
    assert_eq!(result_run.predecessor_count, 1);
    assert!(store.task_runs_for(run.id).iter().all(|tr| !tr.is_complete()));
}

#[tokio::test]
async fn test_persistence_failure_stops_the_run() {
    let downstream = CountingTask::new();
    let downstream_calls = downstream.counter();
    let graph = Arc::new(
        GraphBuilder::new()
            .source("a", Arc::new(CountingTask::new()))
            .task("b", Arc::new(downstream), ["a"])
            .build()
            .unwrap(),
    );
    let store = Arc::new(FailingCompletionStore {
        inner: InMemoryTaskRunStore::new(),
        fail_task: "a".into(),
    });
    let runner = runner_with(store.clone(), options(2));

    let error = runner.run(graph).await.unwrap_err();

    let run_id = match error {
        ExecutionError::Persistence {
            run_id,
            ref task_id,
            source: StoreError::Backend(_),
        } if task_id == "a" => run_id,
        other => panic!("expected persistence error, got {:?}", other),
    };
    assert_eq!(downstream_calls.load(Ordering::SeqCst), 0);
    assert!(store
        .inner
        .task_runs_for(run_id)
        .iter()
        .all(|tr| !tr.is_complete()));
}

#[tokio::test]
async fn test_panic_fails_the_run_by_default() {
    let graph = Arc::new(
        GraphBuilder::new()
            .source("boom", Arc::new(PanickingTask))
            .build()
            .unwrap(),
    );
    let runner = Runner::new(Arc::new(InMemoryTaskRunStore::new()), options(1));

    let error = runner.run(graph).await.unwrap_err();

    assert!(matches!(
        error,
        ExecutionError::TaskPanicked { ref task_id, ref message, .. }
            if task_id == "boom" && message == "simulated task panic"
    ));
}

#[tokio::test]
async fn test_panic_can_be_contained_to_the_task() {
    let graph = Arc::new(
        GraphBuilder::new()
            .source("boom", Arc::new(PanickingTask))
            .source("fine", Arc::new(LiteralTask::new(json!(1))))
            .build()
            .unwrap(),
    );
    let runner = Runner::new(
        Arc::new(InMemoryTaskRunStore::new()),
        RunnerOptions {
            panic_policy: PanicPolicy::FailTask,
            ..options(2)
        },
    );

    let outcome = runner.run(graph).await.unwrap();

    assert_eq!(
        outcome.result.errors,
        vec![
            Some(ResultError::Task(TaskError::Panicked("simulated task panic".into()))),
            None
        ]
    );
    assert_eq!(outcome.result.values[1], json!(1));
}

#[tokio::test]
async fn test_task_timeout_becomes_a_data_level_error() {
    let graph = Arc::new(
        GraphBuilder::new()
            .source(
                "slow",
                Arc::new(DelayedTask::new(
                    Duration::from_secs(30),
                    TaskResult::ok(json!(1)),
                )),
            )
            .build()
            .unwrap(),
    );
    let runner = Runner::new(
        Arc::new(InMemoryTaskRunStore::new()),
        RunnerOptions {
            task_timeout: Some(Duration::from_millis(50)),
            ..options(1)
        },
    );

    let outcome = runner.run(graph).await.unwrap();

    assert_eq!(
        outcome.result.errors,
        vec![Some(ResultError::Task(TaskError::Timeout { millis: 50 }))]
    );
}

#[tokio::test]
async fn test_cancellation_discards_in_flight_results_and_blocks_admission() {
    let gate = GatedTask::new(TaskResult::ok(json!(1)));
    let started = gate.started();
    let release = gate.release();
    let downstream = CountingTask::new();
    let downstream_calls = downstream.counter();

    let graph = Arc::new(
        GraphBuilder::new()
            .source("gate", Arc::new(gate))
            .task("after", Arc::new(downstream), ["gate"])
            .build()
            .unwrap(),
    );
    let store = Arc::new(InMemoryTaskRunStore::new());
    let runner = Runner::new(store.clone(), options(2));

    let handle = runner.start(graph).await.unwrap();
    let run = handle.pipeline_run().clone();

    started.notified().await;
    handle.cancel();
    release.notify_one();

    let error = handle.wait().await.unwrap_err();

    assert!(matches!(error, ExecutionError::Cancelled { run_id } if run_id == run.id));
    assert_eq!(downstream_calls.load(Ordering::SeqCst), 0);
    let gate_run = store
        .get_task_run(run.task_run_id("gate").unwrap())
        .await
        .unwrap();
    assert!(!gate_run.is_complete());
    assert!(!runner.is_run_complete(&run).await.unwrap());
}

#[tokio::test]
async fn test_concurrency_limit_is_respected() {
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut builder = GraphBuilder::new();
    for i in 0..6 {
        builder = builder.source(
            format!("worker{}", i),
            Arc::new(ConcurrencyGauge {
                current: current.clone(),
                peak: peak.clone(),
            }),
        );
    }
    let graph = Arc::new(builder.build().unwrap());
    let runner = Runner::new(Arc::new(InMemoryTaskRunStore::new()), options(2));

    runner.run(graph).await.unwrap();

    let peak = peak.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 2, "peak concurrency was {}", peak);
}

#[tokio::test]
async fn test_concurrent_runs_share_one_graph() {
    let graph: Arc<Graph> = Arc::new(
        GraphBuilder::new()
            .source("x", Arc::new(LiteralTask::new(json!(2))))
            .task(
                "scaled",
                Arc::new(crate::tasks::MultiplyTask::new(3.0)),
                vec![InputRef::at("x", 0)],
            )
            .build()
            .unwrap(),
    );
    let store = Arc::new(InMemoryTaskRunStore::new());
    let runner = Runner::new(store.clone(), options(4));

    let mut runs = tokio::task::JoinSet::new();
    for _ in 0..5 {
        let runner = runner.clone();
        let graph = graph.clone();
        runs.spawn(async move { runner.run(graph).await });
    }

    let mut run_ids = Vec::new();
    while let Some(joined) = runs.join_next().await {
        let outcome = joined.unwrap().unwrap();
        assert_eq!(outcome.result.values, vec![json!(6.0)]);
        run_ids.push(outcome.run_id);
    }

    run_ids.sort_by_key(|id| id.0);
    run_ids.dedup();
    assert_eq!(run_ids.len(), 5);
    assert_eq!(store.len(), 5 * graph.len());
}
