// src/config/model.rs

use serde::Deserialize;

use crate::graph::GraphModel;
use crate::plan::PlannerOptions;

/// Graph description as read from a TOML file, before validation.
///
/// ```toml
/// [planner]
/// tie_epsilon = 1e-6
/// reuse = "in-place"
///
/// [[pass]]
/// name = "scene"
/// outputs = [{ name = "color", class = "rgba16f" }]
///
/// [[pass]]
/// name = "final"
/// inputs = ["scene.color"]
/// ```
///
/// All sections are optional; an empty file parses but fails validation.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawGraphFile {
    /// Planner tunables from `[planner]`.
    #[serde(default)]
    pub planner: PlannerOptions,

    /// Passes from `[[pass]]`, in declaration order.
    #[serde(default, rename = "pass")]
    pub passes: Vec<PassConfig>,
}

/// `[[pass]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PassConfig {
    pub name: String,

    /// Consumed resources as `"<pass>.<output>"`, in order.
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Produced resources, in order. A pass without outputs is the sink.
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

/// One produced resource of a pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub name: String,

    /// Pool key. Outputs with equal classes may share instances.
    pub class: String,
}

/// Validated graph description: planner options plus a graph whose
/// structure has been checked (single sink, no cycles, all references
/// resolved).
#[derive(Debug, Clone)]
pub struct GraphFile {
    pub planner: PlannerOptions,
    pub graph: GraphModel<String>,
}

impl GraphFile {
    pub(crate) fn new_unchecked(planner: PlannerOptions, graph: GraphModel<String>) -> Self {
        Self { planner, graph }
    }
}
