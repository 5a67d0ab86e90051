// src/plan/pools.rs

//! Pool grouping and capacity sizing.

use tracing::{debug, trace};

use crate::errors::{PlanError, Result};
use crate::graph::{Dependencies, GraphModel, PassNode};
use crate::types::{PassId, PoolId, ResourceClass, ResourceId, ReuseMode};

/// Resources grouped into pools by class equality, with each pool's
/// capacity once sized.
#[derive(Debug, Clone)]
pub struct PoolLayout<C> {
    classes: Vec<C>,
    capacities: Vec<usize>,
    pool_of: Vec<PoolId>,
}

impl<C: ResourceClass> PoolLayout<C> {
    /// Group resources by class. The first resource of a class creates its
    /// pool, so pools are numbered by first appearance.
    pub fn group(graph: &GraphModel<C>) -> Self {
        let mut classes: Vec<C> = Vec::new();
        let mut pool_of = Vec::with_capacity(graph.resource_count());

        for res in graph.resources() {
            let pool = match classes.iter().position(|c| *c == res.class) {
                Some(i) => i,
                None => {
                    classes.push(res.class.clone());
                    classes.len() - 1
                }
            };
            pool_of.push(PoolId(pool));
        }

        let capacities = vec![0; classes.len()];
        Self {
            classes,
            capacities,
            pool_of,
        }
    }

    pub fn pool_count(&self) -> usize {
        self.classes.len()
    }

    pub fn pool_of(&self, r: ResourceId) -> PoolId {
        self.pool_of[r.0]
    }

    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    pub fn into_parts(self) -> (Vec<C>, Vec<usize>) {
        (self.classes, self.capacities)
    }

    /// Inputs of `pass` whose instance is handed over to one of the pass's
    /// outputs, as `(input, output)` pairs.
    ///
    /// Only inputs consumed by nothing but this pass qualify, and only for
    /// outputs in the same pool. Within a pool, inputs and outputs pair up in
    /// declaration order.
    pub fn handovers(
        &self,
        pass: &PassNode,
        deps: &Dependencies,
        reuse: ReuseMode,
    ) -> Vec<(ResourceId, ResourceId)> {
        if reuse == ReuseMode::AfterPass {
            return Vec::new();
        }

        let mut pairs = Vec::new();
        let mut taken = vec![false; pass.outputs.len()];

        for &input in &pass.inputs {
            if !deps.has_sole_consumer(input) {
                continue;
            }
            let pool = self.pool_of(input);
            let slot = pass
                .outputs
                .iter()
                .enumerate()
                .position(|(i, &out)| !taken[i] && self.pool_of(out) == pool);
            if let Some(i) = slot {
                taken[i] = true;
                pairs.push((input, pass.outputs[i]));
            }
        }

        pairs
    }

    /// Size every pool by replaying `order` and recording the peak number of
    /// simultaneously live resources per pool.
    ///
    /// Per pass: handed-over inputs die, outputs become live (the peak is
    /// sampled here), then the remaining inputs whose last use this is die.
    pub fn size(
        &mut self,
        graph: &GraphModel<C>,
        deps: &Dependencies,
        order: &[PassId],
        reuse: ReuseMode,
    ) -> Result<()> {
        let mut live = vec![0usize; self.pool_count()];
        let mut peak = vec![0usize; self.pool_count()];
        let mut remaining = deps.remaining_uses();

        for &id in order {
            let pass = graph.pass(id);
            let handed = self.handovers(pass, deps, reuse);

            for &(input, _) in &handed {
                let pool = self.pool_of(input).0;
                live[pool] = live[pool].checked_sub(1).ok_or_else(|| {
                    PlanError::Internal(format!("pool p{pool} live count underflow at '{}'", pass.name))
                })?;
            }

            for &out in &pass.outputs {
                let pool = self.pool_of(out).0;
                live[pool] += 1;
                peak[pool] = peak[pool].max(live[pool]);
            }

            for &input in &pass.inputs {
                remaining[input.0] = remaining[input.0].checked_sub(1).ok_or_else(|| {
                    PlanError::Internal(format!("resource r{} consumed too often", input.0))
                })?;
                if remaining[input.0] == 0 && !handed.iter().any(|&(i, _)| i == input) {
                    let pool = self.pool_of(input).0;
                    live[pool] = live[pool].checked_sub(1).ok_or_else(|| {
                        PlanError::Internal(format!("pool p{pool} live count underflow at '{}'", pass.name))
                    })?;
                }
            }

            trace!(pass = %pass.name, ?live, "pool occupancy after pass");
        }

        debug!(capacities = ?peak, "pools sized");
        self.capacities = peak;
        Ok(())
    }
}
