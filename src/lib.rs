// src/lib.rs

//! Offline scheduler for graphs of passes that produce and consume
//! short-lived resources.
//!
//! Given a [`GraphModel`](graph::GraphModel), [`plan`](plan::plan) computes:
//! - a sequential execution order ending at the graph's single sink pass,
//! - pools of reusable instances, one per resource class, sized by peak
//!   concurrent occupancy,
//! - batches of mutually independent passes,
//! - per pass, the `(pool, instance)` pairs it acquires and releases.
//!
//! The result is an immutable [`Schedule`](schedule::Schedule) that a host
//! walks (see [`ScheduleExecutor`](schedule::ScheduleExecutor)) to drive a
//! real backend.

pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod plan;
pub mod schedule;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{GraphFile, default_graph_path, load_and_validate};
use crate::plan::Planner;
use crate::schedule::Schedule;
use crate::types::ReuseMode;

pub use crate::errors::{PlanError, Result as PlanResult};
pub use crate::graph::{GraphBuilder, GraphModel};
pub use crate::plan::{PlanCache, PlannerOptions, plan};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - graph file loading
/// - planning (with an optional reuse-mode override)
/// - schedule verification
/// - the diagnostics dump on stdout
pub fn run(args: CliArgs) -> Result<()> {
    let path = args.graph.unwrap_or_else(default_graph_path);
    debug!(path = %path.display(), "loading graph file");
    let file = load_and_validate(&path)?;

    if args.dry_run {
        print_dry_run(&file);
        return Ok(());
    }

    let schedule = plan_file(&file, args.reuse)?;
    print!("{schedule}");
    Ok(())
}

/// Plan a validated graph file and verify the result.
pub fn plan_file(file: &GraphFile, reuse: Option<ReuseMode>) -> PlanResult<Schedule<String>> {
    let mut options = file.planner;
    if let Some(reuse) = reuse {
        options.reuse = reuse;
    }

    let planner = Planner::new(options)?;
    let schedule = planner.plan(&file.graph)?;
    schedule.verify()?;

    info!(fingerprint = %schedule.fingerprint(), "schedule verified");
    Ok(schedule)
}

/// Simple dry-run output: print passes, their inputs and outputs.
fn print_dry_run(file: &GraphFile) {
    let graph = &file.graph;

    println!("passplan dry-run");
    println!("  planner.tie_epsilon = {}", file.planner.tie_epsilon);
    println!("  planner.reuse = {:?}", file.planner.reuse);
    println!("  fingerprint = {}", graph.fingerprint());
    println!();

    println!("passes ({}):", graph.pass_count());
    for pass in graph.passes() {
        println!("  - {}", pass.name);
        if !pass.inputs.is_empty() {
            let inputs: Vec<String> = pass
                .inputs
                .iter()
                .map(|&r| {
                    let res = graph.resource(r);
                    format!("{}.{}", graph.pass(res.producer).name, res.name)
                })
                .collect();
            println!("      inputs: {:?}", inputs);
        }
        for &r in &pass.outputs {
            let res = graph.resource(r);
            println!("      output: {} ({})", res.name, res.class);
        }
        if pass.is_sink() {
            println!("      sink: true");
        }
    }

    debug!("dry-run complete (nothing planned)");
}
