// src/plan/cache.rs

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::errors::Result;
use crate::graph::GraphModel;
use crate::plan::Planner;
use crate::schedule::Schedule;
use crate::types::ResourceClass;

/// In-memory cache of schedules keyed by graph fingerprint.
///
/// Planning is meant to happen once per distinct topology, not once per
/// frame. Hosts that rebuild their graph every frame can route it through
/// this cache and only pay for planning when the topology actually changes.
#[derive(Debug)]
pub struct PlanCache<C> {
    planner: Planner,
    schedules: HashMap<String, Schedule<C>>,
}

impl<C: ResourceClass> PlanCache<C> {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner,
            schedules: HashMap::new(),
        }
    }

    /// Get the schedule for `graph`, planning and caching it if necessary.
    pub fn get_or_plan(&mut self, graph: &GraphModel<C>) -> Result<&Schedule<C>> {
        let key = graph.fingerprint();
        match self.schedules.entry(key) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                debug!(fingerprint = %e.key(), "cache miss: planning graph");
                let schedule = self.planner.plan(graph)?;
                Ok(e.insert(schedule))
            }
        }
    }

    pub fn contains(&self, graph: &GraphModel<C>) -> bool {
        self.schedules.contains_key(&graph.fingerprint())
    }

    /// Drop the cached schedule for `fingerprint`, if any.
    pub fn invalidate(&mut self, fingerprint: &str) {
        if self.schedules.remove(fingerprint).is_some() {
            debug!(fingerprint, "invalidated cached schedule");
        }
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    pub fn clear(&mut self) {
        self.schedules.clear();
    }
}
