// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod runtime;

pub mod consts;

pub use loader::{
    build_graph, load_and_build_pipeline, load_pipeline_config, parse_pipeline_config,
    PipelineConfig, RunnerConfig, TaskConfig,
};
pub use runtime::RuntimeBuilder;
