// src/config/validate.rs

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::config::model::{GraphFile, RawGraphFile};
use crate::errors::{PlanError, Result};
use crate::graph::{Dependencies, GraphBuilder, GraphModel, ResourceRef, validate_graph};
use crate::plan::Planner;

impl TryFrom<RawGraphFile> for GraphFile {
    type Error = PlanError;

    fn try_from(raw: RawGraphFile) -> std::result::Result<Self, Self::Error> {
        let graph = validate_raw_graph(&raw)?;
        Ok(GraphFile::new_unchecked(raw.planner, graph))
    }
}

/// Check a raw description and resolve it into a [`GraphModel`].
///
/// Checks, in order:
/// - there is at least one pass
/// - planner options are sane
/// - pass and output names are well-formed and unique
/// - every input names an existing `<pass>.<output>`
/// - the graph has exactly one sink, no cycles, and no pass that bypasses
///   the sink
pub fn validate_raw_graph(raw: &RawGraphFile) -> Result<GraphModel<String>> {
    ensure_has_passes(raw)?;
    Planner::new(raw.planner)?;
    validate_names(raw)?;
    let graph = resolve_graph(raw)?;
    validate_structure(&graph)?;
    Ok(graph)
}

fn ensure_has_passes(raw: &RawGraphFile) -> Result<()> {
    if raw.passes.is_empty() {
        return Err(PlanError::ConfigError(
            "graph must contain at least one [[pass]] section".to_string(),
        ));
    }
    Ok(())
}

fn name_pattern() -> Result<Regex> {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$")
        .map_err(|e| PlanError::Other(anyhow::Error::from(e)))
}

fn validate_names(raw: &RawGraphFile) -> Result<()> {
    let pattern = name_pattern()?;
    let mut passes = HashSet::new();

    for pass in &raw.passes {
        if !pattern.is_match(&pass.name) {
            return Err(PlanError::ConfigError(format!(
                "invalid pass name '{}' (letters, digits, '_' and '-' only)",
                pass.name
            )));
        }
        if !passes.insert(pass.name.as_str()) {
            return Err(PlanError::ConfigError(format!(
                "pass '{}' is declared more than once",
                pass.name
            )));
        }

        let mut outputs = HashSet::new();
        for out in &pass.outputs {
            if !pattern.is_match(&out.name) {
                return Err(PlanError::ConfigError(format!(
                    "pass '{}' has invalid output name '{}'",
                    pass.name, out.name
                )));
            }
            if !outputs.insert(out.name.as_str()) {
                return Err(PlanError::ConfigError(format!(
                    "pass '{}' declares output '{}' more than once",
                    pass.name, out.name
                )));
            }
        }
    }

    Ok(())
}

fn resolve_graph(raw: &RawGraphFile) -> Result<GraphModel<String>> {
    // "<pass>.<output>" -> position
    let mut positions: HashMap<String, ResourceRef> = HashMap::new();
    for (p, pass) in raw.passes.iter().enumerate() {
        for (o, out) in pass.outputs.iter().enumerate() {
            positions.insert(format!("{}.{}", pass.name, out.name), ResourceRef::new(p, o));
        }
    }

    let mut builder = GraphBuilder::new();
    for pass in &raw.passes {
        let mut decl = builder.pass(pass.name.clone());

        for input in &pass.inputs {
            let r = positions.get(input.trim()).ok_or_else(|| {
                PlanError::ConfigError(format!(
                    "pass '{}' has unknown input '{}' (expected \"<pass>.<output>\")",
                    pass.name, input
                ))
            })?;
            decl = decl.input(*r);
        }
        for out in &pass.outputs {
            decl = decl.named_output(out.name.clone(), out.class.clone());
        }

        decl.finish();
    }

    builder.build()
}

fn validate_structure(graph: &GraphModel<String>) -> Result<()> {
    let deps = Dependencies::index(graph);
    validate_graph(graph, &deps)?;
    Ok(())
}
