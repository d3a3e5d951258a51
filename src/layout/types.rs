//! Layout types: graph description in, positioned nodes and edges out.
//!
//! Input records (`NodeSpec`, `EdgeSpec`, `GraphInput`) and output records
//! (`Point`, `LayoutNode`, `LayoutEdge`, `LayoutResult`) all derive serde so
//! the same shapes travel through the JSON API, the CLI and the WASM bindings.

use serde::{Deserialize, Serialize};

// ─── Direction ───────────────────────────────────────────────────────────────

/// Flow direction of the layout. Picks which screen axis is the rank axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Ranks advance left to right; order within a rank runs top to bottom.
    LR,
    /// Ranks advance top to bottom; order within a rank runs left to right.
    #[default]
    #[serde(alias = "TD")]
    TB,
}

impl Direction {
    /// Parse "LR", "TB" (or "TD"), case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LR" => Some(Direction::LR),
            "TB" | "TD" => Some(Direction::TB),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::LR => "LR",
            Direction::TB => "TB",
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::LR)
    }
}

// ─── Input records ───────────────────────────────────────────────────────────

/// A node to lay out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Extra width reserved around the node (e.g. for attached edge labels).
    #[serde(default)]
    pub extra_width: f64,
    #[serde(default)]
    pub extra_height: f64,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            extra_width: 0.0,
            extra_height: 0.0,
        }
    }

    pub fn with_extra(mut self, extra_width: f64, extra_height: f64) -> Self {
        self.extra_width = extra_width;
        self.extra_height = extra_height;
        self
    }

    /// Width of the box the layout reserves for this node.
    pub fn box_width(&self) -> f64 {
        self.width + self.extra_width
    }

    pub fn box_height(&self) -> f64 {
        self.height + self.extra_height
    }
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSpec {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Minimum number of rank gaps the edge must span. Defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minlen: Option<usize>,
    /// Straightness priority during coordinate assignment. Defaults to 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Minimum face-to-face distance along the rank axis, in layout units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<f64>,
}

impl EdgeSpec {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            minlen: None,
            weight: None,
            min_length: None,
        }
    }

    /// Shorthand edge whose id is `"{source}-{target}"`.
    pub fn between(source: &str, target: &str) -> Self {
        Self::new(format!("{source}-{target}"), source, target)
    }

    pub fn with_minlen(mut self, minlen: usize) -> Self {
        self.minlen = Some(minlen);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_min_length(mut self, min_length: f64) -> Self {
        self.min_length = Some(min_length);
        self
    }
}

/// The full graph description consumed by one layout call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

impl GraphInput {
    pub fn new(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>) -> Self {
        Self { nodes, edges }
    }
}

// ─── Point ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

// ─── LayoutNode ──────────────────────────────────────────────────────────────

/// A node with its computed position.
///
/// `x`/`y` follow the configured origin convention (center or top-left of the
/// node box); `width`/`height` are the box size including any extra extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub rank: usize,
    pub order: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutNode {
    /// Center of the node box, whatever origin convention `x`/`y` use.
    pub fn center(&self, origin: crate::config::Origin) -> Point {
        match origin {
            crate::config::Origin::Center => Point::new(self.x, self.y),
            crate::config::Origin::TopLeft => {
                Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
            }
        }
    }
}

// ─── LayoutEdge ──────────────────────────────────────────────────────────────

/// An edge with its anchor points and polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Anchor on the source node's face.
    pub source_point: Point,
    /// Anchor on the target node's face.
    pub target_point: Point,
    /// Polyline from `source_point` to `target_point` through bend points.
    pub points: Vec<Point>,
    /// Arc-length midpoint of `points`, for placing a label.
    pub label_anchor: Point,
    /// True when the edge was reversed to break a cycle.
    pub reversed: bool,
}

// ─── LayoutResult ────────────────────────────────────────────────────────────

/// The full output of one layout call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub direction: Direction,
    pub origin: crate::config::Origin,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    /// Width of the drawing's bounding box.
    pub width: f64,
    /// Height of the drawing's bounding box.
    pub height: f64,
    pub rank_count: usize,
}

impl LayoutResult {
    pub fn new(direction: Direction, origin: crate::config::Origin) -> Self {
        Self {
            direction,
            origin,
            nodes: Vec::new(),
            edges: Vec::new(),
            width: 0.0,
            height: 0.0,
            rank_count: 0,
        }
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&LayoutEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Center of the node with the given id.
    pub fn center_of(&self, id: &str) -> Option<Point> {
        self.node(id).map(|n| n.center(self.origin))
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_types.rs"]
mod tests;
