// src/plan/mod.rs

//! Planning pipeline: graph in, [`Schedule`] out.
//!
//! - [`order`] linearizes the passes.
//! - [`pools`] groups resources by class and sizes each pool.
//! - [`batch`] cuts the order into concurrent batches.
//! - [`alloc`] assigns instances to every produced resource.
//! - [`cache`] keeps schedules keyed by graph fingerprint.
//!
//! Each stage only reads the results of the stages before it.

pub mod alloc;
pub mod batch;
pub mod cache;
pub mod order;
pub mod pools;

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{PlanError, Result};
use crate::graph::{Dependencies, GraphModel, validate_graph};
use crate::schedule::{Pool, Schedule};
use crate::types::{PoolId, ResourceClass, ReuseMode};

pub use cache::PlanCache;
pub use pools::PoolLayout;

/// Tunables for [`Planner`]; also the `[planner]` section of a graph file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerOptions {
    /// Satisfaction scores closer than this count as tied, and the pass with
    /// more inputs plus outputs wins.
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f64,

    #[serde(default)]
    pub reuse: ReuseMode,
}

fn default_tie_epsilon() -> f64 {
    1e-6
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            tie_epsilon: default_tie_epsilon(),
            reuse: ReuseMode::default(),
        }
    }
}

/// Plans graphs into schedules. Holds no state besides its options, so one
/// planner can serve any number of graphs.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    options: PlannerOptions,
}

impl Planner {
    pub fn new(options: PlannerOptions) -> Result<Self> {
        if !options.tie_epsilon.is_finite() || options.tie_epsilon < 0.0 {
            return Err(PlanError::ConfigError(format!(
                "tie_epsilon must be finite and >= 0 (got {})",
                options.tie_epsilon
            )));
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Plan `graph`.
    ///
    /// Fails, without producing anything, if the graph has no sink or several,
    /// contains a cycle, or has a pass that does not feed the sink.
    pub fn plan<C: ResourceClass>(&self, graph: &GraphModel<C>) -> Result<Schedule<C>> {
        let reuse = self.options.reuse;
        let deps = Dependencies::index(graph);
        let sink = validate_graph(graph, &deps)?;

        let order = order::plan_order(graph, &deps, sink, self.options.tie_epsilon)?;

        let mut layout = PoolLayout::group(graph);
        layout.size(graph, &deps, &order, reuse)?;

        let batch_ids = batch::plan_batches(graph, &deps, &layout, &order, reuse)?;
        let batches = alloc::allocate(graph, &deps, &layout, &batch_ids, reuse)?;

        let (classes, capacities) = layout.into_parts();
        let pools: Vec<Pool<C>> = classes
            .into_iter()
            .zip(capacities)
            .enumerate()
            .map(|(i, (class, capacity))| Pool {
                id: PoolId(i),
                class,
                capacity,
            })
            .collect();

        let schedule = Schedule {
            fingerprint: graph.fingerprint(),
            reuse,
            order,
            pools,
            batches,
        };

        debug!(fingerprint = %schedule.fingerprint(), "schedule assembled");
        info!(
            passes = schedule.pass_count(),
            batches = schedule.batches().len(),
            pools = schedule.pools().len(),
            instances = schedule.total_instances(),
            "graph planned"
        );

        Ok(schedule)
    }
}

/// Plan `graph` with default options.
pub fn plan<C: ResourceClass>(graph: &GraphModel<C>) -> Result<Schedule<C>> {
    Planner::default().plan(graph)
}
