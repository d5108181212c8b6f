// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! TaskRun persistence implementations.

mod memory;

pub use memory::InMemoryTaskRunStore;
