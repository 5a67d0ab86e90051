// src/graph/deps.rs

use tracing::{debug, warn};

use crate::graph::model::GraphModel;
use crate::types::{PassId, ResourceClass, ResourceId};

/// Producer and consumer lists per resource, derived once from a graph.
///
/// Consumers are listed in pass declaration order. A resource without
/// consumers is legal: it is allocated and never released, and keeping it
/// alive is the caller's business.
#[derive(Debug, Clone)]
pub struct Dependencies {
    producers: Vec<PassId>,
    consumers: Vec<Vec<PassId>>,
}

impl Dependencies {
    pub fn index<C: ResourceClass>(graph: &GraphModel<C>) -> Self {
        let producers: Vec<PassId> = graph.resources().iter().map(|r| r.producer).collect();
        let mut consumers = vec![Vec::new(); graph.resource_count()];

        for pass in graph.passes() {
            for r in &pass.inputs {
                consumers[r.0].push(pass.id);
            }
        }

        for (i, list) in consumers.iter().enumerate() {
            if list.is_empty() {
                let res = &graph.resources()[i];
                warn!(
                    resource = %res.name,
                    producer = %graph.pass(res.producer).name,
                    "resource has no consumers; its instance is never released"
                );
            }
        }

        debug!(resources = producers.len(), "dependencies indexed");

        Self {
            producers,
            consumers,
        }
    }

    pub fn producer(&self, r: ResourceId) -> PassId {
        self.producers[r.0]
    }

    /// Whether `r` has exactly one consumer, i.e. no other pass can be
    /// reading it while that consumer runs.
    pub fn has_sole_consumer(&self, r: ResourceId) -> bool {
        self.consumers[r.0].len() == 1
    }

    /// Fresh remaining-use counters, one per resource, set to the fan-out.
    pub fn remaining_uses(&self) -> Vec<usize> {
        self.consumers.iter().map(Vec::len).collect()
    }
}
