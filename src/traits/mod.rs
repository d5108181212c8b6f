// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod store;
pub mod task;

pub use store::TaskRunStore;
pub use task::Task;
