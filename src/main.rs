// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use pipeline_core::config::consts::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};
use pipeline_core::config::{load_pipeline_config, RuntimeBuilder};
use pipeline_core::store::InMemoryTaskRunStore;

/// Install the global subscriber. `PIPELINE_LOG` takes an `EnvFilter`
/// directive such as `debug` or `pipeline_core::engine=trace`.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

const USAGE: &str = "Usage: pipeline-runner <pipeline.yaml>";

/// The single pipeline path from the process arguments, program name excluded.
fn pipeline_path<I: IntoIterator<Item = String>>(args: I) -> Result<String> {
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(path), None) => Ok(path),
        _ => bail!(USAGE),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let path = pipeline_path(env::args().skip(1))?;

    let cfg = load_pipeline_config(&path)
        .with_context(|| format!("failed to load pipeline {}", path))?;
    let store = Arc::new(InMemoryTaskRunStore::new());
    let (graph, runner) = RuntimeBuilder::from_config(&cfg, store)
        .with_context(|| format!("invalid pipeline {}", path))?;

    // completion is logged by the runner
    let outcome = runner.run(graph).await.context("pipeline run failed")?;

    println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    Ok(())
}
