// src/config/mod.rs

//! Graph description files for the `passplan` binary.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a description from disk (`loader.rs`).
//! - Validate it into a [`GraphModel`](crate::graph::GraphModel)
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_graph_path, load_and_validate, load_from_path, parse_str};
pub use model::{GraphFile, OutputConfig, PassConfig, RawGraphFile};
pub use validate::validate_raw_graph;
