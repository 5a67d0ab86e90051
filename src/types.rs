// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Key deciding which resources may share a pool.
///
/// The planner only ever compares classes for equality; it never looks
/// inside them. Anything `PartialEq + Clone + Debug` qualifies.
pub trait ResourceClass: PartialEq + Clone + fmt::Debug {}

impl<T: PartialEq + Clone + fmt::Debug> ResourceClass for T {}

/// Index of a pass in its [`GraphModel`](crate::graph::GraphModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassId(pub usize);

/// Index of a resource in its [`GraphModel`](crate::graph::GraphModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(pub usize);

/// Index of a pool in a [`Schedule`](crate::schedule::Schedule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolId(pub usize);

impl PassId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ResourceId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl PoolId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// When a pass gives back the instances of the inputs it uses last.
///
/// - `InPlace`: an input whose *only* consumer is the pass is released before
///   the pass acquires its outputs, so an output may take over the input's
///   instance. Inputs shared with other consumers are still released after
///   the pass (a sibling may be reading them concurrently).
/// - `AfterPass`: every input is released after the pass has acquired its
///   outputs; no pass ever reads and writes the same instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReuseMode {
    #[default]
    InPlace,
    AfterPass,
}

impl FromStr for ReuseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in-place" | "inplace" => Ok(ReuseMode::InPlace),
            "after-pass" | "afterpass" => Ok(ReuseMode::AfterPass),
            other => Err(format!(
                "invalid reuse mode: {other} (expected \"in-place\" or \"after-pass\")"
            )),
        }
    }
}
