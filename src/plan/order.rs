// src/plan/order.rs

//! Greedy execution-order planner.
//!
//! Passes are emitted one at a time. Each step starts at the sink and walks
//! upstream, always stepping to the most "satisfied" unordered producer,
//! until it reaches a pass whose producers are all ordered already. That
//! pass goes next. The walk favours passes that finish off resources close
//! to their last use, which keeps pool occupancy down.

use tracing::{debug, trace};

use crate::errors::{PlanError, Result};
use crate::graph::{Dependencies, GraphModel};
use crate::types::{PassId, ResourceClass};

#[derive(Debug, Clone, Copy)]
struct Score {
    satisfaction: f64,
    complexity: usize,
}

impl Score {
    /// Higher satisfaction wins; within `epsilon`, the larger pass wins.
    fn beats(&self, other: &Score, epsilon: f64) -> bool {
        if (self.satisfaction - other.satisfaction).abs() <= epsilon {
            self.complexity > other.complexity
        } else {
            self.satisfaction > other.satisfaction
        }
    }
}

struct OrderState<'g, C> {
    graph: &'g GraphModel<C>,
    deps: &'g Dependencies,
    remaining: Vec<usize>,
    ordered: Vec<bool>,
    epsilon: f64,
}

impl<'g, C: ResourceClass> OrderState<'g, C> {
    fn score(&self, id: PassId) -> Score {
        let pass = self.graph.pass(id);
        let mut satisfaction = -(pass.outputs.len() as f64);
        for r in &pass.inputs {
            let left = self.remaining[r.0];
            if left > 0 {
                satisfaction += 1.0 / left as f64;
            }
        }
        Score {
            satisfaction,
            complexity: pass.inputs.len() + pass.outputs.len(),
        }
    }

    /// Best unordered producer among the inputs of `id`. Full ties keep the
    /// earliest input.
    fn best_producer(&self, id: PassId) -> Option<PassId> {
        let mut best: Option<(PassId, Score)> = None;

        for &r in &self.graph.pass(id).inputs {
            let producer = self.deps.producer(r);
            if self.ordered[producer.0] {
                continue;
            }
            let score = self.score(producer);
            let replace = match &best {
                Some((_, current)) => score.beats(current, self.epsilon),
                None => true,
            };
            if replace {
                best = Some((producer, score));
            }
        }

        best.map(|(p, _)| p)
    }

    /// Walk upstream from `sink` to the next ready pass.
    fn descend(&self, sink: PassId) -> Result<PassId> {
        let mut current = sink;
        // An acyclic walk visits each pass at most once.
        for _ in 0..=self.graph.pass_count() {
            match self.best_producer(current) {
                Some(next) => current = next,
                None => return Ok(current),
            }
        }
        Err(PlanError::Internal(format!(
            "descent from '{}' did not terminate",
            self.graph.pass(sink).name
        )))
    }

    fn mark_ordered(&mut self, id: PassId) -> Result<()> {
        self.ordered[id.0] = true;
        for r in &self.graph.pass(id).inputs {
            self.remaining[r.0] = self.remaining[r.0].checked_sub(1).ok_or_else(|| {
                PlanError::Internal(format!("resource r{} consumed too often", r.0))
            })?;
        }
        Ok(())
    }
}

/// Linearize every pass of `graph` into one topologically valid order that
/// ends with `sink`.
///
/// `graph` must already be validated: acyclic, with every pass feeding
/// `sink`.
pub fn plan_order<C: ResourceClass>(
    graph: &GraphModel<C>,
    deps: &Dependencies,
    sink: PassId,
    epsilon: f64,
) -> Result<Vec<PassId>> {
    let total = graph.pass_count();
    let mut state = OrderState {
        graph,
        deps,
        remaining: deps.remaining_uses(),
        ordered: vec![false; total],
        epsilon,
    };
    let mut order = Vec::with_capacity(total);

    while order.len() < total {
        let ready = state.descend(sink)?;

        if ready == sink && order.len() + 1 < total {
            return Err(PlanError::Internal(format!(
                "sink '{}' became ready with {} passes unordered",
                graph.pass(sink).name,
                total - order.len() - 1
            )));
        }

        trace!(pass = %graph.pass(ready).name, position = order.len(), "pass ordered");
        state.mark_ordered(ready)?;
        order.push(ready);
    }

    debug!(passes = order.len(), "execution order planned");
    Ok(order)
}
