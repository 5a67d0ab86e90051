// src/graph/builder.rs

//! Build API for [`GraphModel`].

use std::collections::HashSet;

use tracing::debug;

use crate::errors::{PlanError, Result};
use crate::graph::model::{GraphModel, PassNode, ResourceNode, ResourceRef};
use crate::types::{PassId, ResourceClass, ResourceId};

#[derive(Debug, Clone)]
struct OutputDecl<C> {
    name: String,
    class: C,
}

#[derive(Debug, Clone)]
struct PassDecl<C> {
    name: String,
    inputs: Vec<ResourceRef>,
    outputs: Vec<OutputDecl<C>>,
}

/// Handle to a declared pass, used to reference its outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassHandle {
    index: usize,
}

impl PassHandle {
    pub fn index(self) -> usize {
        self.index
    }

    /// Reference to this pass's `n`-th output.
    pub fn output(self, n: usize) -> ResourceRef {
        ResourceRef::new(self.index, n)
    }
}

/// Collects pass declarations and resolves them into a [`GraphModel`].
///
/// ```
/// use passplan::graph::GraphBuilder;
///
/// let mut builder = GraphBuilder::new();
/// let scene = builder.pass("scene").output("hdr").finish();
/// builder.pass("final").input(scene.output(0)).finish();
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.pass_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder<C> {
    passes: Vec<PassDecl<C>>,
}

impl<C: ResourceClass> Default for GraphBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ResourceClass> GraphBuilder<C> {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Start declaring a new pass. The pass is only added once
    /// [`PassBuilder::finish`] is called.
    pub fn pass(&mut self, name: impl Into<String>) -> PassBuilder<'_, C> {
        PassBuilder {
            builder: self,
            decl: PassDecl {
                name: name.into(),
                inputs: Vec::new(),
                outputs: Vec::new(),
            },
        }
    }

    /// Resolve every declared input into the resource it references.
    ///
    /// Resources are numbered in pass declaration order, then output order.
    /// Fails on references to passes or outputs that were never declared and
    /// on passes consuming the same resource twice.
    pub fn build(self) -> Result<GraphModel<C>> {
        let mut first_resource = Vec::with_capacity(self.passes.len());
        let mut resources = Vec::new();

        for (pass_index, decl) in self.passes.iter().enumerate() {
            first_resource.push(resources.len());
            for (output_index, out) in decl.outputs.iter().enumerate() {
                resources.push(ResourceNode {
                    id: ResourceId(resources.len()),
                    name: out.name.clone(),
                    class: out.class.clone(),
                    producer: PassId(pass_index),
                    output_index,
                });
            }
        }

        let mut passes = Vec::with_capacity(self.passes.len());
        for (pass_index, decl) in self.passes.iter().enumerate() {
            let mut inputs = Vec::with_capacity(decl.inputs.len());
            let mut seen = HashSet::new();

            for r in &decl.inputs {
                let producer = self.passes.get(r.pass).ok_or_else(|| PlanError::UnknownPass {
                    pass: decl.name.clone(),
                    referenced: r.pass,
                })?;
                if r.output >= producer.outputs.len() {
                    return Err(PlanError::UnknownOutput {
                        pass: decl.name.clone(),
                        producer: producer.name.clone(),
                        output: r.output,
                    });
                }

                let id = ResourceId(first_resource[r.pass] + r.output);
                if !seen.insert(id) {
                    return Err(PlanError::DuplicateInput {
                        pass: decl.name.clone(),
                        resource: format!("{}.{}", producer.name, producer.outputs[r.output].name),
                    });
                }
                inputs.push(id);
            }

            let start = first_resource[pass_index];
            passes.push(PassNode {
                id: PassId(pass_index),
                name: decl.name.clone(),
                inputs,
                outputs: (start..start + decl.outputs.len()).map(ResourceId).collect(),
            });
        }

        debug!(
            passes = passes.len(),
            resources = resources.len(),
            "graph built"
        );

        Ok(GraphModel { passes, resources })
    }
}

/// Declaration of a single pass; see [`GraphBuilder::pass`].
#[derive(Debug)]
pub struct PassBuilder<'a, C> {
    builder: &'a mut GraphBuilder<C>,
    decl: PassDecl<C>,
}

impl<'a, C: ResourceClass> PassBuilder<'a, C> {
    /// Consume a resource produced by another pass.
    pub fn input(mut self, r: ResourceRef) -> Self {
        self.decl.inputs.push(r);
        self
    }

    pub fn inputs(mut self, refs: impl IntoIterator<Item = ResourceRef>) -> Self {
        self.decl.inputs.extend(refs);
        self
    }

    /// Produce a resource of the given class, named after its position.
    pub fn output(self, class: C) -> Self {
        let name = format!("out{}", self.decl.outputs.len());
        self.named_output(name, class)
    }

    pub fn named_output(mut self, name: impl Into<String>, class: C) -> Self {
        self.decl.outputs.push(OutputDecl {
            name: name.into(),
            class,
        });
        self
    }

    /// Add the pass to the graph and return its handle.
    pub fn finish(self) -> PassHandle {
        let index = self.builder.passes.len();
        self.builder.passes.push(self.decl);
        PassHandle { index }
    }
}
