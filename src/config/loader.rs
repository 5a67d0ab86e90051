// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{GraphFile, RawGraphFile};
use crate::errors::Result;

/// Load a graph description from a given path and return the raw
/// `RawGraphFile`.
///
/// This only performs TOML deserialization; it does **not** check the graph
/// (references, sink, cycles). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawGraphFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}

pub fn parse_str(contents: &str) -> Result<RawGraphFile> {
    let raw: RawGraphFile = toml::from_str(contents)?;
    Ok(raw)
}

/// Load a graph description from path and validate it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Resolves `"<pass>.<output>"` references into a graph.
/// - Rejects missing or duplicate sinks, cycles, and passes that do not
///   feed the sink.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<GraphFile> {
    let raw = load_from_path(&path)?;
    GraphFile::try_from(raw)
}

/// Default graph file: `Passplan.toml` in the current working directory.
pub fn default_graph_path() -> PathBuf {
    PathBuf::from("Passplan.toml")
}
