// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Task graph declaration, validation and construction.

mod builder;
mod model;
mod validation;

pub use builder::GraphBuilder;
pub use model::{Graph, GraphNode, InputRef, TaskDeclaration};
pub use validation::validate_declarations;
