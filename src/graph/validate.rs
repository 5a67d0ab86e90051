// src/graph/validate.rs

//! Structural checks run before planning.
//!
//! The order planner descends from the sink through producers; it only
//! terminates on acyclic graphs in which every pass feeds the sink, so all
//! of that is established here, up front.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{PlanError, Result};
use crate::graph::deps::Dependencies;
use crate::graph::model::GraphModel;
use crate::types::{PassId, ResourceClass};

/// Validate `graph` and return its sink pass.
pub fn validate_graph<C: ResourceClass>(
    graph: &GraphModel<C>,
    deps: &Dependencies,
) -> Result<PassId> {
    let sink = find_sink(graph)?;
    ensure_acyclic(graph, deps)?;
    ensure_feeds_sink(graph, deps, sink)?;
    Ok(sink)
}

/// The unique pass declaring zero outputs.
pub fn find_sink<C: ResourceClass>(graph: &GraphModel<C>) -> Result<PassId> {
    let sinks = graph.sinks();
    match sinks.as_slice() {
        [] => Err(PlanError::NoSink),
        [sink] => Ok(*sink),
        _ => Err(PlanError::MultipleSinks {
            passes: sinks.iter().map(|&p| graph.pass(p).name.clone()).collect(),
        }),
    }
}

pub fn ensure_acyclic<C: ResourceClass>(graph: &GraphModel<C>, deps: &Dependencies) -> Result<()> {
    // Edge direction: producer -> consumer.
    let mut dag: DiGraphMap<usize, ()> = DiGraphMap::new();

    for pass in graph.passes() {
        dag.add_node(pass.id.0);
    }

    for pass in graph.passes() {
        for &r in &pass.inputs {
            dag.add_edge(deps.producer(r).0, pass.id.0, ());
        }
    }

    match toposort(&dag, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let pass = graph.pass(PassId(cycle.node_id()));
            Err(PlanError::DependencyCycle(format!(
                "cycle detected in pass graph involving pass '{}'",
                pass.name
            )))
        }
    }
}

/// Every pass must be an ancestor of the sink; anything else could never be
/// reached by the order planner's descent.
pub fn ensure_feeds_sink<C: ResourceClass>(
    graph: &GraphModel<C>,
    deps: &Dependencies,
    sink: PassId,
) -> Result<()> {
    let mut reached = vec![false; graph.pass_count()];
    let mut stack = vec![sink];
    reached[sink.0] = true;

    while let Some(id) = stack.pop() {
        for &r in &graph.pass(id).inputs {
            let producer = deps.producer(r);
            if !reached[producer.0] {
                reached[producer.0] = true;
                stack.push(producer);
            }
        }
    }

    match reached.iter().position(|&seen| !seen) {
        Some(i) => Err(PlanError::DisconnectedPass {
            pass: graph.pass(PassId(i)).name.clone(),
        }),
        None => Ok(()),
    }
}
