// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::{build_graph, PipelineConfig};
use crate::engine::{Runner, RunnerOptions};
use crate::errors::ConfigError;
use crate::graph::Graph;
use crate::traits::TaskRunStore;

/// Pipeline runtime builder - turns a configuration into a graph and a runner.
///
/// # Example
/// ```
/// use pipeline_core::config::{parse_pipeline_config, RuntimeBuilder};
/// use pipeline_core::store::InMemoryTaskRunStore;
/// use std::sync::Arc;
///
/// let cfg = parse_pipeline_config(r#"
/// runner:
///   max_concurrency: 2
/// tasks:
///   - id: answer
///     type: literal
///     options: { value: 42 }
/// "#).unwrap();
///
/// let (graph, runner) = RuntimeBuilder::from_config(&cfg, Arc::new(InMemoryTaskRunStore::new())).unwrap();
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(runner.options().max_concurrency, 2);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the validated graph and a runner configured from `cfg.runner`.
    ///
    /// The graph is returned behind an `Arc` so that any number of runs can
    /// execute it concurrently.
    pub fn from_config(
        cfg: &PipelineConfig,
        store: Arc<dyn TaskRunStore>,
    ) -> Result<(Arc<Graph>, Runner), ConfigError> {
        let graph = build_graph(cfg)?;
        let runner = Runner::new(store, RunnerOptions::from(&cfg.runner));
        Ok((Arc::new(graph), runner))
    }
}
