//! Coordinate assignment.
//!
//! Works in abstract (cross, rank) space and maps to screen (x, y) only when
//! building the result, so LR and TB share every line of the algorithm.
//!
//! Cross axis: pack each rank with the required separations, then relax each
//! vertex toward the weighted mean of its neighbours' positions. A relaxed
//! rank is projected back onto its ordering and separation constraints by
//! isotonic regression (pool adjacent violators), so no pass can ever
//! produce overlap.
//!
//! Rank axis: ranks stack by their largest extent plus the rank separation;
//! gaps under edges with a `min_length` hint stretch until the hint holds.

use std::collections::HashMap;

use super::acyclic::Dag;
use super::graph::LayoutGraph;
use super::normalize::{Chain, LayerGraph, VertexKind};
use super::order::Ordering;
use super::types::{Direction, LayoutEdge, LayoutNode, LayoutResult, Point};
use crate::config::{LayoutConfig, Origin};

/// Weight of a vertex with no neighbour on the side being relaxed.
const UNANCHORED_WEIGHT: f64 = 1.0;

/// Abstract coordinates of every vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    /// Center along the cross axis, per vertex.
    pub cross: Vec<f64>,
    /// Center along the rank axis, per rank.
    pub rank_center: Vec<f64>,
    /// Largest rank extent per rank.
    pub rank_extent: Vec<f64>,
}

impl Coordinates {
    pub fn rank_pos(&self, lg: &LayerGraph, v: usize) -> f64 {
        self.rank_center[lg.vertices[v].rank]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relax {
    Upper,
    Lower,
    Both,
}

pub fn assign_coordinates(lg: &LayerGraph, ordering: &Ordering, config: &LayoutConfig) -> Coordinates {
    let cross = assign_cross(lg, ordering, config);
    let (rank_center, rank_extent) = assign_ranks_axis(lg, ordering, config);
    Coordinates {
        cross,
        rank_center,
        rank_extent,
    }
}

/// Minimum center distance between two neighbours of a rank.
///
/// Each vertex contributes half its cross extent and half its gap: the node
/// separation for real nodes, the edge separation for bend points. Two real
/// nodes thus stay at least `node_separation` apart even with bend points
/// between them.
pub fn separation(lg: &LayerGraph, a: usize, b: usize, config: &LayoutConfig) -> f64 {
    let half = |v: usize| {
        let vertex = &lg.vertices[v];
        let gap = if vertex.is_dummy() {
            config.edge_separation
        } else {
            config.node_separation
        };
        (vertex.cross_extent + gap) / 2.0
    };
    half(a) + half(b)
}

fn assign_cross(lg: &LayerGraph, ordering: &Ordering, config: &LayoutConfig) -> Vec<f64> {
    let mut cross = vec![0.0; lg.vertex_count()];
    for rank in ordering {
        let mut x = 0.0;
        for (i, &v) in rank.iter().enumerate() {
            if i > 0 {
                x += separation(lg, rank[i - 1], v, config);
            }
            cross[v] = x;
        }
    }

    let passes = config.alignment_iterations;
    for pass in 0..passes {
        let mode = if pass + 1 == passes {
            Relax::Both
        } else if pass % 2 == 0 {
            Relax::Upper
        } else {
            Relax::Lower
        };
        let ranks: Vec<usize> = if mode == Relax::Lower {
            (0..ordering.len()).rev().collect()
        } else {
            (0..ordering.len()).collect()
        };
        for r in ranks {
            relax_rank(lg, &ordering[r], &mut cross, mode, config);
        }
    }

    let min = lg
        .vertices
        .iter()
        .enumerate()
        .map(|(v, vertex)| cross[v] - vertex.cross_extent / 2.0)
        .fold(f64::INFINITY, f64::min);
    if min.is_finite() {
        for x in cross.iter_mut() {
            *x -= min;
        }
    }
    cross
}

fn relax_rank(lg: &LayerGraph, rank: &[usize], cross: &mut [f64], mode: Relax, config: &LayoutConfig) {
    if rank.is_empty() {
        return;
    }
    let mut targets = Vec::with_capacity(rank.len());
    let mut weights = Vec::with_capacity(rank.len());
    for &v in rank {
        let mut sum = 0.0;
        let mut total = 0.0;
        if mode != Relax::Lower {
            for &s in &lg.up[v] {
                let seg = &lg.segments[s];
                sum += seg.weight * cross[seg.upper];
                total += seg.weight;
            }
        }
        if mode != Relax::Upper {
            for &s in &lg.down[v] {
                let seg = &lg.segments[s];
                sum += seg.weight * cross[seg.lower];
                total += seg.weight;
            }
        }
        if total > 0.0 {
            targets.push(sum / total);
            weights.push(total);
        } else {
            targets.push(cross[v]);
            weights.push(UNANCHORED_WEIGHT);
        }
    }
    let gaps: Vec<f64> = rank
        .windows(2)
        .map(|w| separation(lg, w[0], w[1], config))
        .collect();
    let placed = isotonic_projection(&targets, &weights, &gaps);
    for (&v, x) in rank.iter().zip(placed) {
        cross[v] = x;
    }
}

/// Weighted least-squares placement of `targets` subject to
/// `x[i + 1] - x[i] >= gaps[i]`.
///
/// Substituting `y[i] = x[i] - offset[i]` (offset = prefix sum of gaps) turns
/// the constraints into `y` non-decreasing, which pool adjacent violators
/// solves exactly.
pub fn isotonic_projection(targets: &[f64], weights: &[f64], gaps: &[f64]) -> Vec<f64> {
    let n = targets.len();
    let mut offsets = Vec::with_capacity(n);
    let mut acc = 0.0;
    for i in 0..n {
        if i > 0 {
            acc += gaps[i - 1];
        }
        offsets.push(acc);
    }

    // (weighted sum, total weight, length)
    let mut blocks: Vec<(f64, f64, usize)> = Vec::with_capacity(n);
    for i in 0..n {
        blocks.push((weights[i] * (targets[i] - offsets[i]), weights[i], 1));
        while blocks.len() >= 2 {
            let (s1, w1, l1) = blocks[blocks.len() - 1];
            let (s0, w0, l0) = blocks[blocks.len() - 2];
            if s0 / w0 <= s1 / w1 {
                break;
            }
            blocks.pop();
            let last = blocks.len() - 1;
            blocks[last] = (s0 + s1, w0 + w1, l0 + l1);
        }
    }

    let mut placed = Vec::with_capacity(n);
    for (sum, weight, len) in blocks {
        let y = sum / weight;
        for _ in 0..len {
            placed.push(y + offsets[placed.len()]);
        }
    }
    placed
}

/// Rank centers along the rank axis, plus each rank's largest extent.
fn assign_ranks_axis(lg: &LayerGraph, ordering: &Ordering, config: &LayoutConfig) -> (Vec<f64>, Vec<f64>) {
    let rank_extent: Vec<f64> = ordering
        .iter()
        .map(|rank| {
            rank.iter()
                .map(|&v| lg.vertices[v].rank_extent)
                .fold(0.0, f64::max)
        })
        .collect();
    let mut gaps = vec![config.rank_separation; rank_extent.len().saturating_sub(1)];
    let mut centers = stack_ranks(&rank_extent, &gaps);

    let mut hinted: Vec<&Chain> = lg.chains.iter().filter(|c| c.min_length > 0.0).collect();
    hinted.sort_by_key(|c| (c.vertices.len(), c.edge.index()));
    for chain in hinted {
        let (Some(&upper), Some(&lower)) = (chain.vertices.first(), chain.vertices.last()) else {
            continue;
        };
        let (r0, r1) = (lg.vertices[upper].rank, lg.vertices[lower].rank);
        let span = r1 - r0;
        if span == 0 {
            continue;
        }
        let face_distance = (centers[r1] - lg.vertices[lower].rank_extent / 2.0)
            - (centers[r0] + lg.vertices[upper].rank_extent / 2.0);
        let deficit = chain.min_length - face_distance;
        if deficit > 0.0 {
            for gap in &mut gaps[r0..r1] {
                *gap += deficit / span as f64;
            }
            centers = stack_ranks(&rank_extent, &gaps);
        }
    }
    (centers, rank_extent)
}

fn stack_ranks(extents: &[f64], gaps: &[f64]) -> Vec<f64> {
    let mut centers = Vec::with_capacity(extents.len());
    let mut edge = 0.0;
    for (r, &extent) in extents.iter().enumerate() {
        if r > 0 {
            edge += gaps[r - 1];
        }
        centers.push(edge + extent / 2.0);
        edge += extent;
    }
    centers
}

// ─── Result assembly ─────────────────────────────────────────────────────────

fn to_screen(direction: Direction, cross: f64, rank: f64) -> Point {
    match direction {
        Direction::TB => Point::new(cross, rank),
        Direction::LR => Point::new(rank, cross),
    }
}

/// Half the intrinsic (label-free) node size along the rank axis.
fn half_face(g: &LayoutGraph, v: usize, lg: &LayerGraph) -> f64 {
    match lg.vertices[v].kind {
        VertexKind::Node(idx) => {
            let data = &g.digraph[idx];
            if g.direction.is_horizontal() {
                data.width / 2.0
            } else {
                data.height / 2.0
            }
        }
        VertexKind::Dummy { .. } => 0.0,
    }
}

/// Turn abstract coordinates into the caller-facing result.
pub fn build_result(
    g: &LayoutGraph,
    dag: &Dag,
    lg: &LayerGraph,
    ordering: &Ordering,
    coords: &Coordinates,
    config: &LayoutConfig,
) -> LayoutResult {
    let direction = g.direction;
    let mut order_of = vec![0usize; lg.vertex_count()];
    for rank in ordering {
        for (i, &v) in rank.iter().enumerate() {
            order_of[v] = i;
        }
    }

    // Bounding box over node boxes and bend points, in unshifted space.
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for idx in g.digraph.node_indices() {
        let v = idx.index();
        let data = &g.digraph[idx];
        let c = to_screen(direction, coords.cross[v], coords.rank_pos(lg, v));
        min.x = min.x.min(c.x - data.box_width / 2.0);
        min.y = min.y.min(c.y - data.box_height / 2.0);
        max.x = max.x.max(c.x + data.box_width / 2.0);
        max.y = max.y.max(c.y + data.box_height / 2.0);
    }
    let mut extra_points: Vec<Point> = lg
        .vertices
        .iter()
        .enumerate()
        .filter(|(_, vertex)| vertex.is_dummy())
        .map(|(v, _)| to_screen(direction, coords.cross[v], coords.rank_pos(lg, v)))
        .collect();
    for &edge in &dag.self_loops {
        let v = g.endpoints(edge).0.index();
        let center = to_screen(direction, coords.cross[v], coords.rank_pos(lg, v));
        extra_points.extend(self_loop_route(g, lg, v, center, config));
    }
    for p in extra_points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    if !min.x.is_finite() {
        min = Point::default();
        max = Point::default();
    }
    let shift = Point::new(config.margin - min.x, config.margin - min.y);
    let place = |v: usize| {
        let p = to_screen(direction, coords.cross[v], coords.rank_pos(lg, v));
        Point::new(p.x + shift.x, p.y + shift.y)
    };

    let mut result = LayoutResult::new(direction, config.origin);
    result.rank_count = lg.rank_count;
    result.width = (max.x - min.x) + 2.0 * config.margin;
    result.height = (max.y - min.y) + 2.0 * config.margin;

    for idx in g.digraph.node_indices() {
        let v = idx.index();
        let data = &g.digraph[idx];
        let center = place(v);
        let (x, y) = match config.origin {
            Origin::Center => (center.x, center.y),
            Origin::TopLeft => (
                center.x - data.box_width / 2.0,
                center.y - data.box_height / 2.0,
            ),
        };
        result.nodes.push(LayoutNode {
            id: data.id.clone(),
            rank: lg.vertices[v].rank,
            order: order_of[v],
            x,
            y,
            width: data.box_width,
            height: data.box_height,
        });
    }

    let chain_of: HashMap<usize, &Chain> = lg.chains.iter().map(|c| (c.edge.index(), c)).collect();
    let rank_axis = |p: Point, delta: f64| match direction {
        Direction::TB => Point::new(p.x, p.y + delta),
        Direction::LR => Point::new(p.x + delta, p.y),
    };

    for edge in g.digraph.edge_indices() {
        let data = &g.digraph[edge];
        let (src, tgt) = g.endpoints(edge);
        let (points, reversed) = if let Some(chain) = chain_of.get(&edge.index()) {
            let last = chain.vertices.len() - 1;
            let mut points: Vec<Point> = chain
                .vertices
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let p = place(v);
                    if i == 0 {
                        rank_axis(p, half_face(g, v, lg))
                    } else if i == last {
                        rank_axis(p, -half_face(g, v, lg))
                    } else {
                        p
                    }
                })
                .collect();
            if chain.reversed {
                points.reverse();
            }
            (points, chain.reversed)
        } else {
            (self_loop_route(g, lg, src.index(), place(src.index()), config), false)
        };

        let source_point = points.first().copied().unwrap_or_else(|| place(src.index()));
        let target_point = points.last().copied().unwrap_or_else(|| place(tgt.index()));
        result.edges.push(LayoutEdge {
            id: data.id.clone(),
            source: g.digraph[src].id.clone(),
            target: g.digraph[tgt].id.clone(),
            source_point,
            target_point,
            label_anchor: label_anchor(&points),
            points,
            reversed,
        });
    }

    debug_assert_eq!(
        result.edges.iter().filter(|e| e.reversed).count(),
        dag.reversed_count()
    );
    result
}

/// A small rectangular loop off the node's trailing face.
fn self_loop_route(g: &LayoutGraph, lg: &LayerGraph, v: usize, center: Point, config: &LayoutConfig) -> Vec<Point> {
    let face = half_face(g, v, lg);
    let reach = config.rank_separation / 2.0;
    let spread = lg.vertices[v].cross_extent / 4.0;
    let at = |cross: f64, rank: f64| match g.direction {
        Direction::TB => Point::new(center.x + cross, center.y + rank),
        Direction::LR => Point::new(center.x + rank, center.y + cross),
    };
    vec![
        at(-spread, face),
        at(-spread, face + reach),
        at(spread, face + reach),
        at(spread, face),
    ]
}

/// Point halfway along the polyline by arc length.
pub fn label_anchor(points: &[Point]) -> Point {
    let Some(&first) = points.first() else {
        return Point::default();
    };
    let total: f64 = points.windows(2).map(|w| w[0].distance(&w[1])).sum();
    if total == 0.0 {
        return first;
    }
    let mut remaining = total / 2.0;
    for w in points.windows(2) {
        let len = w[0].distance(&w[1]);
        if len >= remaining && len > 0.0 {
            let t = remaining / len;
            return Point::new(
                w[0].x + (w[1].x - w[0].x) * t,
                w[0].y + (w[1].y - w[0].y) * t,
            );
        }
        remaining -= len;
    }
    points[points.len() - 1]
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_position.rs"]
mod tests;
