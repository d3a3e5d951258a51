//! layered-layout: layered (Sugiyama-style) layout for directed graphs.
//!
//! Graph in (nodes with sizes, edges with hints), positions out.
//!
//! Public API: `layout()` for typed input, `layout_json()` for JSON input.

pub mod config;
pub mod error;
pub mod labels;
pub mod layout;
pub mod proximity;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::Deserialize;

pub use crate::config::{CyclePolicy, LayoutConfig, Origin, Ranker};
pub use crate::error::{LayoutError, Result};
pub use crate::layout::{
    Direction, EdgeSpec, GraphInput, LayeredLayout, LayoutEdge, LayoutNode, LayoutResult, NodeSpec,
    Point,
};

/// Lay out a graph.
pub fn layout(input: &GraphInput, config: &LayoutConfig) -> Result<LayoutResult> {
    LayeredLayout::layout(input, config)
}

/// JSON request: the graph's `nodes` and `edges` plus an optional `config`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutRequest {
    #[serde(flatten)]
    pub graph: GraphInput,
    #[serde(default)]
    pub config: LayoutConfig,
}

impl LayoutRequest {
    pub fn parse(src: &str) -> Result<Self> {
        Ok(serde_json::from_str(src)?)
    }
}

/// Parse a direction string ("LR", "TB"/"TD").
pub fn parse_direction(s: &str) -> Result<Direction> {
    Direction::parse(s).ok_or_else(|| {
        LayoutError::InvalidParameter {
            name: "direction".to_string(),
            reason: format!("unknown direction '{s}'; use LR or TB"),
        }
    })
}

/// Lay out a graph given as JSON `{ "nodes": [...], "edges": [...], "config": {...} }`
/// and return the result as pretty-printed JSON.
///
/// `direction` overrides the request's own config when given.
pub fn layout_json(src: &str, direction: Option<&str>) -> Result<String> {
    let request = LayoutRequest::parse(src)?;
    let mut config = request.config;
    if let Some(dir) = direction {
        config.direction = parse_direction(dir)?;
    }
    let result = layout(&request.graph, &config)?;
    Ok(serde_json::to_string_pretty(&result)?)
}
