//! Virtual node insertion.
//!
//! Every DAG edge spanning more than one rank becomes a chain of dummy
//! vertices, one per intermediate rank, so ordering and coordinate
//! assignment only ever see segments between adjacent ranks. The dummy
//! vertices later become the bend points of the edge's polyline.

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::acyclic::Dag;
use super::graph::LayoutGraph;
use super::rank::RankAssignment;

/// What a vertex of the layered graph stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    Node(NodeIndex),
    /// Bend point of the given chain.
    Dummy { chain: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub kind: VertexKind,
    pub rank: usize,
    pub rank_extent: f64,
    pub cross_extent: f64,
}

impl Vertex {
    pub fn is_dummy(&self) -> bool {
        matches!(self.kind, VertexKind::Dummy { .. })
    }
}

/// An edge between vertices of adjacent ranks.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub upper: usize,
    pub lower: usize,
    /// Straightening priority used by coordinate assignment.
    pub weight: f64,
}

/// The vertices a DAG edge runs through, upper end first.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    /// Edge of the layout graph.
    pub edge: EdgeIndex,
    pub reversed: bool,
    pub min_length: f64,
    pub vertices: Vec<usize>,
}

/// Proper layered graph: every segment joins rank `r` to rank `r + 1`.
///
/// Vertex `i < node_count` is layout-graph node `i`; dummies follow.
pub struct LayerGraph {
    pub vertices: Vec<Vertex>,
    pub segments: Vec<Segment>,
    /// Segment ids entering each vertex from the rank above.
    pub up: Vec<Vec<usize>>,
    /// Segment ids leaving each vertex toward the rank below.
    pub down: Vec<Vec<usize>>,
    pub chains: Vec<Chain>,
    pub rank_count: usize,
}

impl LayerGraph {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn dummy_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_dummy()).count()
    }

    /// Vertices of the rank above connected to `v`.
    pub fn upper_neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.up[v].iter().map(move |&s| self.segments[s].upper)
    }

    /// Vertices of the rank below connected to `v`.
    pub fn lower_neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.down[v].iter().map(move |&s| self.segments[s].lower)
    }

    fn add_vertex(&mut self, vertex: Vertex) -> usize {
        self.vertices.push(vertex);
        self.up.push(Vec::new());
        self.down.push(Vec::new());
        self.vertices.len() - 1
    }

    fn add_segment(&mut self, upper: usize, lower: usize, weight: f64) {
        let id = self.segments.len();
        self.segments.push(Segment {
            upper,
            lower,
            weight,
        });
        self.down[upper].push(id);
        self.up[lower].push(id);
    }
}

/// Build the proper layered graph from the ranked DAG.
pub fn insert_dummy_nodes(g: &LayoutGraph, dag: &Dag, ranks: &RankAssignment) -> LayerGraph {
    let mut lg = LayerGraph {
        vertices: Vec::with_capacity(g.node_count()),
        segments: Vec::with_capacity(dag.graph.edge_count()),
        up: Vec::with_capacity(g.node_count()),
        down: Vec::with_capacity(g.node_count()),
        chains: Vec::with_capacity(dag.graph.edge_count()),
        rank_count: ranks.rank_count,
    };

    for idx in g.digraph.node_indices() {
        let data = &g.digraph[idx];
        lg.add_vertex(Vertex {
            kind: VertexKind::Node(idx),
            rank: ranks.rank_of(idx),
            rank_extent: data.rank_extent,
            cross_extent: data.cross_extent,
        });
    }

    // Chains follow input edge order, so dummy ids are deterministic.
    let mut dag_edges: Vec<_> = dag.graph.edge_references().collect();
    dag_edges.sort_by_key(|e| e.weight().edge.index());

    for e in dag_edges {
        let (upper, lower) = (e.source().index(), e.target().index());
        let data = e.weight();
        let chain_id = lg.chains.len();
        let (r0, r1) = (lg.vertices[upper].rank, lg.vertices[lower].rank);

        let mut vertices = vec![upper];
        let mut prev = upper;
        for rank in (r0 + 1)..r1 {
            let dummy = lg.add_vertex(Vertex {
                kind: VertexKind::Dummy { chain: chain_id },
                rank,
                rank_extent: 0.0,
                cross_extent: 0.0,
            });
            let weight = data.weight * straightness(&lg, prev, dummy);
            lg.add_segment(prev, dummy, weight);
            vertices.push(dummy);
            prev = dummy;
        }
        let weight = data.weight * straightness(&lg, prev, lower);
        lg.add_segment(prev, lower, weight);
        vertices.push(lower);

        lg.chains.push(Chain {
            edge: data.edge,
            reversed: data.reversed,
            min_length: data.min_length,
            vertices,
        });
    }

    tracing::debug!(
        dummies = lg.dummy_count(),
        segments = lg.segments.len(),
        "dummy nodes inserted"
    );
    lg
}

/// Gansner et al.'s omega factor: 1 between real nodes, 2 next to one
/// dummy, 8 between two dummies.
fn straightness(lg: &LayerGraph, a: usize, b: usize) -> f64 {
    match (lg.vertices[a].is_dummy(), lg.vertices[b].is_dummy()) {
        (false, false) => 1.0,
        (true, true) => 8.0,
        _ => 2.0,
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_normalize.rs"]
mod tests;
