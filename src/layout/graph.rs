//! Graph model. Validates the caller's node/edge records and loads them into
//! a petgraph DiGraph for the layout phases.
//!
//! The direction flag is folded in here: every node records its extent along
//! the rank axis and along the order (cross) axis, and no later phase looks at
//! width or height directly.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

use super::types::{Direction, EdgeSpec, NodeSpec};
use crate::error::{LayoutError, Result};

/// Largest accepted `minlen`. Each spanned rank costs a dummy vertex.
pub const MAX_MINLEN: usize = 1024;

/// Node data stored in the petgraph DiGraph.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub id: String,
    /// Intrinsic size, without extra extent.
    pub width: f64,
    pub height: f64,
    /// Reserved box size, including extra extent.
    pub box_width: f64,
    pub box_height: f64,
    /// Box size along the rank axis.
    pub rank_extent: f64,
    /// Box size along the order axis.
    pub cross_extent: f64,
}

/// Edge data stored in the petgraph DiGraph.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    pub id: String,
    pub minlen: usize,
    pub weight: f64,
    /// Face-to-face distance hint along the rank axis (0 = none).
    pub min_length: f64,
}

/// The validated graph for one layout call.
pub struct LayoutGraph {
    pub digraph: DiGraph<NodeData, EdgeData>,
    pub direction: Direction,
    /// Maps node id → petgraph NodeIndex.
    pub node_index: HashMap<String, NodeIndex>,
}

impl LayoutGraph {
    pub fn node_count(&self) -> usize {
        self.digraph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.digraph.edge_count()
    }

    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.node_index.get(id).map(|&idx| &self.digraph[idx])
    }

    /// Source and target of an edge.
    pub fn endpoints(&self, edge: EdgeIndex) -> (NodeIndex, NodeIndex) {
        self.digraph
            .edge_endpoints(edge)
            .expect("edge index comes from this graph")
    }
}

/// Validate the node and edge records and build the layout graph.
///
/// Node and edge indices follow input order, which every later phase uses
/// as its deterministic tie-break.
pub fn build_graph(
    nodes: &[NodeSpec],
    edges: &[EdgeSpec],
    direction: Direction,
) -> Result<LayoutGraph> {
    let mut digraph: DiGraph<NodeData, EdgeData> =
        DiGraph::with_capacity(nodes.len(), edges.len());
    let mut node_index: HashMap<String, NodeIndex> = HashMap::with_capacity(nodes.len());

    for spec in nodes {
        if node_index.contains_key(&spec.id) {
            return Err(LayoutError::DuplicateNode(spec.id.clone()));
        }
        check_size(&spec.id, "width", spec.width)?;
        check_size(&spec.id, "height", spec.height)?;
        check_size(&spec.id, "extraWidth", spec.extra_width)?;
        check_size(&spec.id, "extraHeight", spec.extra_height)?;

        let (box_width, box_height) = (spec.box_width(), spec.box_height());
        let (rank_extent, cross_extent) = if direction.is_horizontal() {
            (box_width, box_height)
        } else {
            (box_height, box_width)
        };
        let idx = digraph.add_node(NodeData {
            id: spec.id.clone(),
            width: spec.width,
            height: spec.height,
            box_width,
            box_height,
            rank_extent,
            cross_extent,
        });
        node_index.insert(spec.id.clone(), idx);
    }

    for spec in edges {
        let lookup = |id: &str| {
            node_index
                .get(id)
                .copied()
                .ok_or_else(|| LayoutError::UnknownNodeReference {
                    edge: spec.id.clone(),
                    node: id.to_string(),
                })
        };
        let from = lookup(&spec.source)?;
        let to = lookup(&spec.target)?;
        digraph.add_edge(from, to, edge_data(spec)?);
    }

    Ok(LayoutGraph {
        digraph,
        direction,
        node_index,
    })
}

fn edge_data(spec: &EdgeSpec) -> Result<EdgeData> {
    let minlen = spec.minlen.unwrap_or(1);
    if minlen == 0 || minlen > MAX_MINLEN {
        return Err(LayoutError::invalid(
            format!("edges[{}].minlen", spec.id),
            format!("must be between 1 and {MAX_MINLEN} (got {minlen})"),
        ));
    }
    let weight = spec.weight.unwrap_or(1.0);
    if !weight.is_finite() || weight <= 0.0 {
        return Err(LayoutError::invalid(
            format!("edges[{}].weight", spec.id),
            format!("must be a positive number (got {weight})"),
        ));
    }
    let min_length = spec.min_length.unwrap_or(0.0);
    if !min_length.is_finite() || min_length < 0.0 {
        return Err(LayoutError::invalid(
            format!("edges[{}].minLength", spec.id),
            format!("must be a finite, non-negative number (got {min_length})"),
        ));
    }
    Ok(EdgeData {
        id: spec.id.clone(),
        minlen,
        weight,
        min_length,
    })
}

fn check_size(node: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::invalid(
            format!("nodes[{node}].{field}"),
            format!("must be a finite, non-negative number (got {value})"),
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_graph.rs"]
mod tests;
