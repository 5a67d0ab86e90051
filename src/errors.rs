// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every variant is fatal for the planning attempt that produced it: the
//! planner never hands out a partial [`Schedule`](crate::schedule::Schedule).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("graph has no sink pass (exactly one pass must declare zero outputs)")]
    NoSink,

    #[error("graph has multiple sink passes: {}", .passes.join(", "))]
    MultipleSinks { passes: Vec<String> },

    #[error("Cycle detected in pass graph: {0}")]
    DependencyCycle(String),

    #[error("pass '{pass}' references unknown pass #{referenced}")]
    UnknownPass { pass: String, referenced: usize },

    #[error("pass '{pass}' references output #{output} of pass '{producer}', which does not exist")]
    UnknownOutput {
        pass: String,
        producer: String,
        output: usize,
    },

    #[error("pass '{pass}' consumes resource '{resource}' more than once")]
    DuplicateInput { pass: String, resource: String },

    #[error("pass '{pass}' does not contribute to the sink pass")]
    DisconnectedPass { pass: String },

    #[error("internal planner error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PlanError>;
