// src/plan/alloc.rs

//! Assigns pool instances to resources along the finalized batches.

use tracing::{debug, trace};

use crate::errors::{PlanError, Result};
use crate::graph::{Dependencies, GraphModel};
use crate::plan::pools::PoolLayout;
use crate::schedule::{Batch, Binding, Instance, ScheduledPass};
use crate::types::{PassId, ResourceClass, ReuseMode};

/// Walk `batches` in order and give every produced resource an instance.
///
/// Instances are looked up by resource index, so a consumer always reads the
/// instance its producer was given, whatever order it declares its inputs
/// in.
///
/// A freed instance becomes available again only once its batch is over,
/// because passes of the same batch may run concurrently. The exception is a
/// handover, where the consuming pass itself takes the instance for one of
/// its outputs.
pub fn allocate<C: ResourceClass>(
    graph: &GraphModel<C>,
    deps: &Dependencies,
    layout: &PoolLayout<C>,
    batches: &[Vec<PassId>],
    reuse: ReuseMode,
) -> Result<Vec<Batch>> {
    // Reversed so that `pop` hands out the lowest slot first.
    let mut free: Vec<Vec<usize>> = layout
        .capacities()
        .iter()
        .map(|&cap| (0..cap).rev().collect())
        .collect();
    let mut instance_of: Vec<Option<Instance>> = vec![None; graph.resource_count()];
    let mut remaining = deps.remaining_uses();
    let mut out = Vec::with_capacity(batches.len());

    for (index, ids) in batches.iter().enumerate() {
        let mut deferred: Vec<Instance> = Vec::new();
        let mut passes = Vec::with_capacity(ids.len());

        for &id in ids {
            let pass = graph.pass(id);
            let handed = layout.handovers(pass, deps, reuse);

            let mut inputs = Vec::with_capacity(pass.inputs.len());
            let mut release = Vec::new();
            for &r in &pass.inputs {
                let instance = instance_of[r.0].ok_or_else(|| {
                    PlanError::Internal(format!(
                        "'{}' reads resource r{} before it was produced",
                        pass.name, r.0
                    ))
                })?;
                let binding = Binding {
                    resource: r,
                    instance,
                };
                inputs.push(binding);

                remaining[r.0] = remaining[r.0].checked_sub(1).ok_or_else(|| {
                    PlanError::Internal(format!("resource r{} consumed too often", r.0))
                })?;
                if remaining[r.0] == 0 {
                    release.push(binding);
                    if !handed.iter().any(|&(input, _)| input == r) {
                        deferred.push(instance);
                    }
                }
            }

            let mut acquire = Vec::with_capacity(pass.outputs.len());
            for &o in &pass.outputs {
                let instance = match handed.iter().find(|&&(_, output)| output == o) {
                    Some(&(input, _)) => instance_of[input.0].ok_or_else(|| {
                        PlanError::Internal(format!("handover from unallocated r{}", input.0))
                    })?,
                    None => {
                        let pool = layout.pool_of(o);
                        let slot = free[pool.0].pop().ok_or_else(|| {
                            PlanError::Internal(format!(
                                "pool {pool} exhausted in batch {index} at '{}'",
                                pass.name
                            ))
                        })?;
                        Instance::new(pool, slot)
                    }
                };
                instance_of[o.0] = Some(instance);
                acquire.push(Binding {
                    resource: o,
                    instance,
                });
            }

            trace!(
                batch = index,
                pass = %pass.name,
                acquired = acquire.len(),
                released = release.len(),
                "instances assigned"
            );

            passes.push(ScheduledPass {
                id,
                name: pass.name.clone(),
                inputs,
                acquire,
                release,
            });
        }

        for instance in deferred {
            free[instance.pool.0].push(instance.slot);
        }
        for list in &mut free {
            list.sort_unstable_by(|a, b| b.cmp(a));
        }

        out.push(Batch { index, passes });
    }

    debug!(batches = out.len(), "instances allocated");
    Ok(out)
}

