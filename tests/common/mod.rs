#![allow(dead_code)]

use std::io::Write;

use passplan::schedule::Schedule;
use tempfile::NamedTempFile;

pub use passplan_test_utils::init_tracing;

/// Pass names per batch.
pub fn batch_names<C>(schedule: &Schedule<C>) -> Vec<Vec<String>> {
    schedule
        .batches()
        .iter()
        .map(|b| b.passes.iter().map(|p| p.name.clone()).collect())
        .collect()
}

/// Write `contents` to a temporary `.toml` file.
pub fn graph_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    write!(file, "{contents}").unwrap();
    file
}
