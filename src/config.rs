//! Configuration for the layout pipeline.
//!
//! Every field has a default, so partial JSON configs deserialize cleanly.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::layout::types::Direction;

/// How rank assignment treats directed cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    /// Fail with `CyclicGraph`.
    #[default]
    Reject,
    /// Reverse a feedback arc set before ranking and flag those edges.
    ReverseEdges,
}

/// Rank assignment algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ranker {
    /// Longest path from the sources only.
    LongestPath,
    /// Longest path, then pull nodes toward their neighbours to shorten edges.
    #[default]
    Tight,
}

/// Which point of the node box `LayoutNode::x`/`y` refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    #[default]
    Center,
    TopLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub direction: Direction,
    /// Minimum gap between the boxes of two neighbouring nodes in a rank.
    pub node_separation: f64,
    /// Gap kept around virtual bend points of long edges.
    pub edge_separation: f64,
    /// Gap between the boxes of consecutive ranks.
    pub rank_separation: f64,
    /// Down/up sweep count of the crossing minimisation.
    pub ordering_iterations: usize,
    /// Relaxation passes that straighten edges in coordinate assignment.
    pub alignment_iterations: usize,
    /// Seed for shuffling the initial traversal order. None keeps input order.
    pub seed: Option<u64>,
    pub ranker: Ranker,
    pub cycles: CyclePolicy,
    pub origin: Origin,
    /// Keep ranks that hold no node and no edge instead of compacting them.
    pub preserve_rank_gaps: bool,
    /// Offset of the drawing's bounding box from (0, 0).
    pub margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::TB,
            node_separation: 50.0,
            edge_separation: 10.0,
            rank_separation: 50.0,
            ordering_iterations: 4,
            alignment_iterations: 8,
            seed: None,
            ranker: Ranker::Tight,
            cycles: CyclePolicy::Reject,
            origin: Origin::Center,
            preserve_rank_gaps: false,
            margin: 0.0,
        }
    }
}

impl LayoutConfig {
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Reject separations and iteration counts the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        positive("nodeSeparation", self.node_separation)?;
        positive("edgeSeparation", self.edge_separation)?;
        positive("rankSeparation", self.rank_separation)?;
        if self.ordering_iterations == 0 {
            return Err(LayoutError::invalid(
                "orderingIterations",
                "must be at least 1",
            ));
        }
        if self.alignment_iterations == 0 {
            return Err(LayoutError::invalid(
                "alignmentIterations",
                "must be at least 1",
            ));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(LayoutError::invalid(
                "margin",
                format!("must be a finite, non-negative number (got {})", self.margin),
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::invalid(
            name,
            format!("must be a positive number (got {value})"),
        ))
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_config.rs"]
mod tests;
