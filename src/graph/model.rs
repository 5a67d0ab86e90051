// src/graph/model.rs

use blake3::Hasher;

use crate::types::{PassId, ResourceClass, ResourceId};

/// Positional reference to a pass output: output `output` of pass `pass`,
/// both in declaration order.
///
/// References are resolved into [`ResourceId`]s by
/// [`GraphBuilder::build`](crate::graph::GraphBuilder::build), so a pass may
/// refer to a pass declared after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub pass: usize,
    pub output: usize,
}

impl ResourceRef {
    pub fn new(pass: usize, output: usize) -> Self {
        Self { pass, output }
    }
}

/// A pass of a finalized graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassNode {
    pub id: PassId,
    pub name: String,
    /// Consumed resources, in declaration order.
    pub inputs: Vec<ResourceId>,
    /// Produced resources, in declaration order.
    pub outputs: Vec<ResourceId>,
}

impl PassNode {
    /// A pass with no outputs is a sink.
    pub fn is_sink(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// A resource of a finalized graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode<C> {
    pub id: ResourceId,
    pub name: String,
    pub class: C,
    pub producer: PassId,
    /// Position of this resource in its producer's output list.
    pub output_index: usize,
}

/// Immutable pass/resource graph.
///
/// Passes and resources live in flat vectors; every cross-reference is an
/// index into one of them. The only way to obtain a `GraphModel` is through
/// [`GraphBuilder`](crate::graph::GraphBuilder), which guarantees that every
/// input resolves to exactly one producer. Structural properties (single
/// sink, acyclicity) are checked by the planner.
#[derive(Debug, Clone)]
pub struct GraphModel<C> {
    pub(crate) passes: Vec<PassNode>,
    pub(crate) resources: Vec<ResourceNode<C>>,
}

impl<C: ResourceClass> GraphModel<C> {
    pub fn passes(&self) -> &[PassNode] {
        &self.passes
    }

    pub fn resources(&self) -> &[ResourceNode<C>] {
        &self.resources
    }

    pub fn pass(&self, id: PassId) -> &PassNode {
        &self.passes[id.0]
    }

    pub fn resource(&self, id: ResourceId) -> &ResourceNode<C> {
        &self.resources[id.0]
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Look up a pass by name. Names are not required to be unique; the first
    /// match wins.
    pub fn find_pass(&self, name: &str) -> Option<PassId> {
        self.passes.iter().find(|p| p.name == name).map(|p| p.id)
    }

    /// All passes declaring zero outputs, in declaration order.
    pub fn sinks(&self) -> Vec<PassId> {
        self.passes
            .iter()
            .filter(|p| p.is_sink())
            .map(|p| p.id)
            .collect()
    }

    /// Stable hex digest of everything the planner's output depends on: the
    /// topology, the names, and the pooling of resource classes.
    ///
    /// Two graphs with equal fingerprints produce equal schedules under equal
    /// [`PlannerOptions`](crate::plan::PlannerOptions), which makes the
    /// fingerprint usable as a cache key.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Hasher::new();

        hasher.update(&(self.passes.len() as u64).to_le_bytes());
        for pass in &self.passes {
            hash_str(&mut hasher, &pass.name);
            hasher.update(&(pass.inputs.len() as u64).to_le_bytes());
            for r in &pass.inputs {
                hasher.update(&(r.0 as u64).to_le_bytes());
            }
            hasher.update(&(pass.outputs.len() as u64).to_le_bytes());
            for r in &pass.outputs {
                hasher.update(&(r.0 as u64).to_le_bytes());
            }
        }

        // Classes are only comparable, so hash the partition they induce plus
        // their debug rendering (which ends up in the schedule's pools).
        for (i, res) in self.resources.iter().enumerate() {
            let group = self.resources[..i]
                .iter()
                .position(|other| other.class == res.class)
                .unwrap_or(i);
            hash_str(&mut hasher, &res.name);
            hasher.update(&(group as u64).to_le_bytes());
            hash_str(&mut hasher, &format!("{:?}", res.class));
        }

        hasher.finalize().to_hex().to_string()
    }
}

fn hash_str(hasher: &mut Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}
