// src/schedule/verify.rs

//! Replays a schedule and checks the guarantees callers rely on:
//!
//! - every input was produced in a strictly earlier batch
//! - an instance is never acquired while another resource owns it
//! - a pool's live count never exceeds its capacity
//! - an instance freed in a batch goes to no other pass of that batch
//! - every consumed resource is released exactly once, by its last reader
//! - the only pass without outputs is the last pass of the last batch

use std::collections::HashMap;

use tracing::debug;

use crate::errors::{PlanError, Result};
use crate::schedule::{Instance, PassEvent, Schedule};
use crate::types::{PassId, ResourceId};

#[derive(Debug, Clone, Copy)]
struct Owner {
    resource: ResourceId,
    batch: usize,
    reads: usize,
}

fn violation(msg: String) -> PlanError {
    PlanError::Internal(format!("schedule violation: {msg}"))
}

impl<C> Schedule<C> {
    /// Check the schedule's invariants; see the [module docs](self).
    pub fn verify(&self) -> Result<()> {
        let mut live: HashMap<Instance, Owner> = HashMap::new();
        let mut live_count = vec![0usize; self.pools.len()];
        let mut released_by: HashMap<ResourceId, PassId> = HashMap::new();

        for batch in &self.batches {
            let mut freed_in_batch: HashMap<Instance, PassId> = HashMap::new();

            for pass in &batch.passes {
                for input in &pass.inputs {
                    let owner = live.get_mut(&input.instance).ok_or_else(|| {
                        violation(format!("'{}' reads {} which is not live", pass.name, input.instance))
                    })?;
                    if owner.resource != input.resource {
                        return Err(violation(format!(
                            "'{}' reads {} expecting {} but it holds {}",
                            pass.name, input.instance, input.resource, owner.resource
                        )));
                    }
                    if owner.batch >= batch.index {
                        return Err(violation(format!(
                            "'{}' in batch {} reads {} produced in batch {}",
                            pass.name, batch.index, input.resource, owner.batch
                        )));
                    }
                    owner.reads += 1;
                }

                for event in pass.events() {
                    match event {
                        PassEvent::Release(b) => {
                            if !pass.inputs.contains(&b) {
                                return Err(violation(format!(
                                    "'{}' releases {} which it does not read",
                                    pass.name, b.resource
                                )));
                            }
                            if let Some(prev) = released_by.insert(b.resource, pass.id) {
                                return Err(violation(format!(
                                    "{} released twice (passes {} and {})",
                                    b.resource, prev, pass.id
                                )));
                            }
                            live.remove(&b.instance);
                            live_count[b.instance.pool.0] = live_count[b.instance.pool.0].saturating_sub(1);
                            freed_in_batch.insert(b.instance, pass.id);
                        }
                        PassEvent::Acquire(b) => {
                            let pool = &self.pools[b.instance.pool.0];
                            if b.instance.slot >= pool.capacity {
                                return Err(violation(format!(
                                    "{} is outside pool capacity {}",
                                    b.instance, pool.capacity
                                )));
                            }
                            if let Some(owner) = live.get(&b.instance) {
                                return Err(violation(format!(
                                    "'{}' acquires {} still owned by {}",
                                    pass.name, b.instance, owner.resource
                                )));
                            }
                            if let Some(&freer) = freed_in_batch.get(&b.instance) {
                                if freer != pass.id {
                                    return Err(violation(format!(
                                        "'{}' reuses {} freed by {} in the same batch",
                                        pass.name, b.instance, freer
                                    )));
                                }
                            }
                            live.insert(
                                b.instance,
                                Owner {
                                    resource: b.resource,
                                    batch: batch.index,
                                    reads: 0,
                                },
                            );
                            let count = &mut live_count[b.instance.pool.0];
                            *count += 1;
                            if *count > pool.capacity {
                                return Err(violation(format!(
                                    "pool {} holds {} live instances, capacity {}",
                                    pool.id, count, pool.capacity
                                )));
                            }
                        }
                        PassEvent::Run => {}
                    }
                }
            }
        }

        // Whatever is still live must never have been read.
        if let Some((instance, owner)) = live.iter().find(|(_, o)| o.reads > 0) {
            return Err(violation(format!(
                "{} holding {} was read but never released",
                instance, owner.resource
            )));
        }

        let sinks: Vec<_> = self.passes().filter(|p| p.acquire.is_empty()).collect();
        match (sinks.as_slice(), self.sink()) {
            ([only], Some(last)) if only.id == last.id => {}
            _ => {
                return Err(violation(format!(
                    "expected exactly one pass without outputs, last in the schedule (found {})",
                    sinks.len()
                )));
            }
        }

        debug!(fingerprint = %self.fingerprint, "schedule verified");
        Ok(())
    }
}
