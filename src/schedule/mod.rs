// src/schedule/mod.rs

//! The planner's immutable output.
//!
//! - [`execute`] drives a [`ScheduleExecutor`] through a schedule.
//! - [`verify`] replays a schedule and checks its invariants.
//! - [`dump`] renders the human-readable diagnostics dump.

pub mod dump;
pub mod execute;
pub mod verify;

use std::fmt;

use crate::types::{PassId, PoolId, ResourceId, ReuseMode};

pub use execute::ScheduleExecutor;

/// One reusable slot: instance number `slot` of pool `pool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instance {
    pub pool: PoolId,
    pub slot: usize,
}

impl Instance {
    pub fn new(pool: PoolId, slot: usize) -> Self {
        Self { pool, slot }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pool, self.slot)
    }
}

/// A resource bound to the instance that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub resource: ResourceId,
    pub instance: Instance,
}

/// A sized pool of interchangeable instances for one resource class.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool<C> {
    pub id: PoolId,
    pub class: C,
    /// Peak number of simultaneously live instances; slots are
    /// `0..capacity`.
    pub capacity: usize,
}

/// Step a caller performs for a pass, in order. See [`ScheduledPass::events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassEvent {
    Release(Binding),
    Acquire(Binding),
    Run,
}

/// A pass together with the instance traffic it performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledPass {
    pub id: PassId,
    pub name: String,
    /// Instances holding the pass's inputs, in declaration order.
    pub inputs: Vec<Binding>,
    /// Newly owned instances for the pass's outputs, in declaration order.
    pub acquire: Vec<Binding>,
    /// Inputs this pass uses last; their instances go back to their pools.
    pub release: Vec<Binding>,
}

impl ScheduledPass {
    /// Whether `binding` (one of [`release`](Self::release)) is handed over to
    /// one of this pass's own outputs, and therefore released before the
    /// outputs are acquired.
    pub fn is_handover(&self, binding: &Binding) -> bool {
        self.acquire.iter().any(|a| a.instance == binding.instance)
    }

    /// The ordered steps for this pass:
    ///
    /// 1. releases of instances handed over to this pass's outputs
    /// 2. every acquisition
    /// 3. the pass's own work
    /// 4. the remaining releases
    pub fn events(&self) -> Vec<PassEvent> {
        let mut events = Vec::with_capacity(self.acquire.len() + self.release.len() + 1);

        events.extend(
            self.release
                .iter()
                .filter(|b| self.is_handover(b))
                .map(|b| PassEvent::Release(*b)),
        );
        events.extend(self.acquire.iter().map(|b| PassEvent::Acquire(*b)));
        events.push(PassEvent::Run);
        events.extend(
            self.release
                .iter()
                .filter(|b| !self.is_handover(b))
                .map(|b| PassEvent::Release(*b)),
        );

        events
    }
}

/// Passes that may run in any order, or concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub index: usize,
    pub passes: Vec<ScheduledPass>,
}

/// Sized pools plus the ordered batches of passes.
///
/// A schedule depends only on the graph's topology and classes, so callers
/// with a stable graph plan once and keep it (see
/// [`PlanCache`](crate::plan::PlanCache)).
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule<C> {
    pub(crate) fingerprint: String,
    pub(crate) reuse: ReuseMode,
    pub(crate) order: Vec<PassId>,
    pub(crate) pools: Vec<Pool<C>>,
    pub(crate) batches: Vec<Batch>,
}

impl<C> Schedule<C> {
    /// Fingerprint of the graph this schedule was planned from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn reuse_mode(&self) -> ReuseMode {
        self.reuse
    }

    /// The sequential execution order the batches were cut from.
    pub fn order(&self) -> &[PassId] {
        &self.order
    }

    pub fn pools(&self) -> &[Pool<C>] {
        &self.pools
    }

    pub fn pool(&self, id: PoolId) -> &Pool<C> {
        &self.pools[id.0]
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// All passes, batch by batch.
    pub fn passes(&self) -> impl Iterator<Item = &ScheduledPass> {
        self.batches.iter().flat_map(|b| b.passes.iter())
    }

    pub fn pass_count(&self) -> usize {
        self.batches.iter().map(|b| b.passes.len()).sum()
    }

    pub fn find_pass(&self, name: &str) -> Option<&ScheduledPass> {
        self.passes().find(|p| p.name == name)
    }

    /// Index of the batch containing `pass`.
    pub fn batch_of(&self, pass: PassId) -> Option<usize> {
        self.batches
            .iter()
            .find(|b| b.passes.iter().any(|p| p.id == pass))
            .map(|b| b.index)
    }

    /// The final pass of the final batch.
    pub fn sink(&self) -> Option<&ScheduledPass> {
        self.batches.last().and_then(|b| b.passes.last())
    }

    /// Sum of all pool capacities.
    pub fn total_instances(&self) -> usize {
        self.pools.iter().map(|p| p.capacity).sum()
    }
}
