// src/plan/batch.rs

//! Cuts the execution order into batches of mutually independent passes.
//!
//! Each round scans the still-open passes in execution order against a
//! per-pool *trial* budget that starts from the *committed* budget (free
//! instances left over by earlier batches). A pass whose outputs fit is
//! admitted; the first one that does not fit ends the round. Admitted
//! passes whose inputs all come from earlier batches join the batch; the
//! others keep their reservation so the round cannot overcommit, and are
//! retried next round.
//!
//! The reservations guarantee progress: passes admitted but not ready in
//! one round always fit in the next, and the first open pass is always
//! ready.

use tracing::{debug, trace};

use crate::errors::{PlanError, Result};
use crate::graph::{Dependencies, GraphModel};
use crate::plan::pools::PoolLayout;
use crate::types::{PassId, ResourceClass, ReuseMode};

pub fn plan_batches<C: ResourceClass>(
    graph: &GraphModel<C>,
    deps: &Dependencies,
    layout: &PoolLayout<C>,
    order: &[PassId],
    reuse: ReuseMode,
) -> Result<Vec<Vec<PassId>>> {
    let mut committed: Vec<usize> = layout.capacities().to_vec();
    let mut remaining = deps.remaining_uses();
    let mut batch_of: Vec<Option<usize>> = vec![None; graph.pass_count()];
    let mut open: Vec<PassId> = order.to_vec();
    let mut batches: Vec<Vec<PassId>> = Vec::new();

    while !open.is_empty() {
        let index = batches.len();
        let mut trial = committed.clone();
        let mut finalized = Vec::new();

        for &id in &open {
            let pass = graph.pass(id);
            let ready = pass.inputs.iter().all(|&r| {
                batch_of[deps.producer(r).0].is_some_and(|b| b < index)
            });

            // Outputs taking over an input's instance need no fresh budget,
            // but only a pass that actually runs this round can do that.
            let mut demand = vec![0usize; layout.pool_count()];
            for &out in &pass.outputs {
                demand[layout.pool_of(out).0] += 1;
            }
            if ready {
                for (_, out) in layout.handovers(pass, deps, reuse) {
                    demand[layout.pool_of(out).0] -= 1;
                }
            }

            let fits = demand.iter().zip(&trial).all(|(need, left)| need <= left);
            if !fits {
                trace!(batch = index, pass = %pass.name, "outputs do not fit; closing scan");
                break;
            }
            for (left, need) in trial.iter_mut().zip(&demand) {
                *left -= need;
            }

            if ready {
                finalized.push(id);
            } else {
                trace!(batch = index, pass = %pass.name, "admitted but waiting on inputs");
            }
        }

        if finalized.is_empty() {
            return Err(PlanError::Internal(format!(
                "batch {index} admitted no pass ({} still open)",
                open.len()
            )));
        }

        for &id in &finalized {
            batch_of[id.0] = Some(index);
        }

        // Returns first, so a handover never dips below zero.
        for &id in &finalized {
            for &r in &graph.pass(id).inputs {
                remaining[r.0] = remaining[r.0].checked_sub(1).ok_or_else(|| {
                    PlanError::Internal(format!("resource r{} consumed too often", r.0))
                })?;
                if remaining[r.0] == 0 {
                    committed[layout.pool_of(r).0] += 1;
                }
            }
        }
        for &id in &finalized {
            for &out in &graph.pass(id).outputs {
                let pool = layout.pool_of(out).0;
                committed[pool] = committed[pool].checked_sub(1).ok_or_else(|| {
                    PlanError::Internal(format!(
                        "pool p{pool} over-committed in batch {index} by '{}'",
                        graph.pass(id).name
                    ))
                })?;
            }
        }

        open.retain(|id| batch_of[id.0].is_none());
        debug!(
            batch = index,
            passes = finalized.len(),
            open = open.len(),
            "batch finalized"
        );
        batches.push(finalized);
    }

    Ok(batches)
}
