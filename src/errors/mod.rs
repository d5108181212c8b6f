// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod aggregate;
mod config;
mod execution;
mod factory;
mod keystore;
mod store;
mod task;

pub use aggregate::{ErrorAccumulator, MultiError};
pub use config::{ConfigError, ValidationError};
pub use execution::{ExecutionError, PanicPolicy, SchedulingError};
pub use factory::TaskFactoryError;
pub use keystore::KeyStoreError;
pub use store::StoreError;
pub use task::TaskError;
