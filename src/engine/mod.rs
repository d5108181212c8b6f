// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod run_state;
pub mod runner;

#[cfg(test)]
mod integration_tests;

pub use run_state::{InputSlots, TaskRunNode};
pub use runner::{RunHandle, RunOutcome, Runner, RunnerOptions};
