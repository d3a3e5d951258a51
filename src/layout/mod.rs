//! Layered (Sugiyama-style) layout pipeline.
//!
//! Phases:
//!   1. Graph model (validation, direction relabeling)
//!   2. Cycle handling (reject, or reverse a feedback arc set)
//!   3. Rank assignment (longest path + tightening)
//!   4. Dummy node insertion
//!   5. Crossing minimisation (median + transpose)
//!   6. Coordinate assignment and edge anchors

pub mod acyclic;
pub mod graph;
pub mod normalize;
pub mod order;
pub mod position;
pub mod rank;
pub mod types;

pub use graph::{LayoutGraph, build_graph};
pub use types::{Direction, EdgeSpec, GraphInput, LayoutEdge, LayoutNode, LayoutResult, NodeSpec, Point};

use crate::config::LayoutConfig;
use crate::error::Result;

/// Layered layout engine.
pub struct LayeredLayout;

impl LayeredLayout {
    /// Run the full pipeline on one graph. Stateless: every call builds and
    /// owns its own working data.
    pub fn layout(input: &GraphInput, config: &LayoutConfig) -> Result<LayoutResult> {
        let span = tracing::debug_span!(
            "layout",
            nodes = input.nodes.len(),
            edges = input.edges.len(),
            direction = config.direction.as_str()
        );
        let _enter = span.enter();

        config.validate()?;
        let graph = build_graph(&input.nodes, &input.edges, config.direction)?;
        let dag = acyclic::make_acyclic(&graph, config.cycles)?;
        if dag.reversed_count() > 0 || !dag.self_loops.is_empty() {
            tracing::debug!(
                reversed = dag.reversed_count(),
                self_loops = dag.self_loops.len(),
                "cycles broken"
            );
        }

        let ranks = rank::RankAssignment::assign(&dag, config.ranker, config.preserve_rank_gaps);
        let lg = normalize::insert_dummy_nodes(&graph, &dag, &ranks);
        let ordering = order::minimise_crossings(&lg, config.ordering_iterations, config.seed);
        let coords = position::assign_coordinates(&lg, &ordering, config);
        let result = position::build_result(&graph, &dag, &lg, &ordering, &coords, config);

        tracing::debug!(
            ranks = result.rank_count,
            width = result.width,
            height = result.height,
            "layout finished"
        );
        Ok(result)
    }
}
