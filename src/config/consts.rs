// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Id of the synthetic result task appended to every graph
pub const RESULT_TASK_ID: &str = "__result__";
/// Concurrency used when the host parallelism cannot be determined
pub const FALLBACK_MAX_CONCURRENCY: usize = 4;
/// Environment variable holding the `tracing` filter for the binary
pub const LOG_ENV_VAR: &str = "PIPELINE_LOG";
/// Filter applied when `LOG_ENV_VAR` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
