// src/graph/mod.rs

//! Pass/resource graph: the planner's input.
//!
//! - [`model`] holds the immutable arena-style graph.
//! - [`builder`] is the declaration API that produces it.
//! - [`deps`] derives producer and consumer lists per resource.
//! - [`validate`] checks sink uniqueness, acyclicity and reachability.

pub mod builder;
pub mod deps;
pub mod model;
pub mod validate;

pub use builder::{GraphBuilder, PassBuilder, PassHandle};
pub use deps::Dependencies;
pub use model::{GraphModel, PassNode, ResourceNode, ResourceRef};
pub use validate::validate_graph;
