// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::FALLBACK_MAX_CONCURRENCY;
use crate::errors::{ConfigError, PanicPolicy};
use crate::graph::{Graph, GraphBuilder, InputRef};
use crate::pipeline::TaskType;
use crate::tasks::TaskFactory;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// A pipeline definition: runner settings plus the declared tasks.
///
/// Typically loaded from a YAML file.
///
/// # Example
/// ```yaml
/// runner:
///   max_concurrency: 4
///   task_timeout_ms: 30000
///   panic_policy: fail_run
/// tasks:
///   - id: source
///     type: literal
///     options:
///       value: '{"price": "101.5"}'
///   - id: parse
///     type: json_parse
///     inputs: [source]
///     options:
///       path: [price]
/// ```
#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub runner: RunnerConfig,
    pub tasks: Vec<TaskConfig>,
}

/// Runner-wide execution settings.
///
/// # Fields
/// * `max_concurrency` - upper bound on concurrently running tasks across all runs
/// * `task_timeout_ms` - per-task timeout; a timed out task fails with `TaskError::Timeout`
/// * `panic_policy` - whether a panicking task fails the run or only itself
#[derive(Debug, Default, Deserialize)]
pub struct RunnerConfig {
    pub max_concurrency: Option<usize>,
    pub task_timeout_ms: Option<u64>,
    #[serde(default)]
    pub panic_policy: PanicPolicy,
}

impl RunnerConfig {
    /// Configured concurrency, falling back to the host's available parallelism.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_MAX_CONCURRENCY)
        })
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_ms.map(Duration::from_millis)
    }
}

/// One declared task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    #[serde(default)]
    pub inputs: Vec<InputRef>,
    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>, // task-specific options
}

pub fn parse_pipeline_config(content: &str) -> Result<PipelineConfig, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn load_pipeline_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_pipeline_config(&content)
}

/// Instantiate every declared task and build the validated graph.
pub fn build_graph(cfg: &PipelineConfig) -> Result<Graph, ConfigError> {
    let declarations = TaskFactory::create_declarations(&cfg.tasks)?;
    let graph = declarations
        .into_iter()
        .fold(GraphBuilder::new(), GraphBuilder::push)
        .build()?;
    Ok(graph)
}

pub fn load_and_build_pipeline<P: AsRef<Path>>(
    path: P,
) -> Result<(PipelineConfig, Graph), ConfigError> {
    let cfg = load_pipeline_config(path)?;
    let graph = build_graph(&cfg)?;
    Ok((cfg, graph))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_pipeline() {
        let yaml = r#"
tasks:
  - id: answer
    type: literal
    options:
      value: 42
"#;
        let cfg = parse_pipeline_config(yaml).unwrap();
        assert_eq!(cfg.tasks.len(), 1);
        assert_eq!(cfg.tasks[0].task_type, TaskType::Literal);
        assert!(cfg.tasks[0].inputs.is_empty());
        assert_eq!(cfg.runner.panic_policy, PanicPolicy::FailRun);
        assert!(cfg.runner.task_timeout().is_none());
    }

    #[test]
    fn test_parse_runner_settings() {
        let yaml = r#"
runner:
  max_concurrency: 2
  task_timeout_ms: 1500
  panic_policy: fail_task
tasks: []
"#;
        let cfg = parse_pipeline_config(yaml).unwrap();
        assert_eq!(cfg.runner.max_concurrency(), 2);
        assert_eq!(cfg.runner.task_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(cfg.runner.panic_policy, PanicPolicy::FailTask);
    }

    #[test]
    fn test_default_concurrency_is_positive() {
        assert!(RunnerConfig::default().max_concurrency() >= 1);
    }

    #[test]
    fn test_unknown_task_type_is_a_parse_error() {
        let yaml = r#"
tasks:
  - id: fetch
    type: http
"#;
        assert!(matches!(
            parse_pipeline_config(yaml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_build_graph_reports_validation_errors() {
        let yaml = r#"
tasks:
  - id: a
    type: sum
    inputs: [b]
  - id: b
    type: sum
    inputs: [a]
"#;
        let cfg = parse_pipeline_config(yaml).unwrap();
        match build_graph(&cfg) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }
}
