use super::*;
use crate::config::{CyclePolicy, Ranker};
use crate::layout::LayeredLayout;
use crate::layout::acyclic::make_acyclic;
use crate::layout::graph::build_graph;
use crate::layout::normalize::insert_dummy_nodes;
use crate::layout::order::minimise_crossings;
use crate::layout::rank::RankAssignment;
use crate::layout::types::{EdgeSpec, GraphInput, NodeSpec};

const EPS: f64 = 1e-6;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

fn boxes(ids: &[&str]) -> Vec<NodeSpec> {
    ids.iter().map(|id| NodeSpec::new(*id, 30.0, 20.0)).collect()
}

fn run(nodes: Vec<NodeSpec>, edges: Vec<EdgeSpec>, config: LayoutConfig) -> LayoutResult {
    LayeredLayout::layout(&GraphInput::new(nodes, edges), &config).unwrap()
}

fn layered(nodes: &[NodeSpec], edges: &[EdgeSpec]) -> (LayerGraph, Ordering) {
    let g = build_graph(nodes, edges, Direction::TB).unwrap();
    let dag = make_acyclic(&g, CyclePolicy::Reject).unwrap();
    let ranks = RankAssignment::assign(&dag, Ranker::Tight, false);
    let lg = insert_dummy_nodes(&g, &dag, &ranks);
    let ordering = minimise_crossings(&lg, 4, None);
    (lg, ordering)
}

// ─── Separation and projection ───────────────────────────────────────────────

#[test]
fn test_separation_between_real_nodes() {
    let (lg, _) = layered(&boxes(&["A", "B"]), &[]);
    let config = LayoutConfig::default();
    assert_close(separation(&lg, 0, 1, &config), 80.0);
}

#[test]
fn test_separation_next_to_bend_point() {
    let (lg, _) = layered(
        &boxes(&["A", "B", "C"]),
        &[EdgeSpec::between("A", "B").with_minlen(2), EdgeSpec::between("A", "C")],
    );
    let dummy = (0..lg.vertex_count()).find(|&v| lg.vertices[v].is_dummy()).unwrap();
    let config = LayoutConfig::default();
    // (30 + 50) / 2 + (0 + 10) / 2
    assert_close(separation(&lg, 2, dummy, &config), 45.0);
}

#[test]
fn test_isotonic_projection_keeps_feasible_targets() {
    let placed = isotonic_projection(&[0.0, 20.0], &[1.0, 1.0], &[10.0]);
    assert_close(placed[0], 0.0);
    assert_close(placed[1], 20.0);
}

#[test]
fn test_isotonic_projection_pools_violators() {
    let placed = isotonic_projection(&[0.0, 0.0], &[1.0, 1.0], &[10.0]);
    assert_close(placed[0], -5.0);
    assert_close(placed[1], 5.0);
}

#[test]
fn test_isotonic_projection_respects_weights() {
    let placed = isotonic_projection(&[0.0, 0.0], &[3.0, 1.0], &[8.0]);
    assert_close(placed[1] - placed[0], 8.0);
    assert_close(placed[0], -2.0);
}

#[test]
fn test_isotonic_projection_empty() {
    assert!(isotonic_projection(&[], &[], &[]).is_empty());
}

// ─── Coordinates ─────────────────────────────────────────────────────────────

#[test]
fn test_chain_is_aligned_and_stacked() {
    let (lg, ordering) = layered(
        &boxes(&["A", "B", "C"]),
        &[EdgeSpec::between("A", "B"), EdgeSpec::between("B", "C")],
    );
    let coords = assign_coordinates(&lg, &ordering, &LayoutConfig::default());
    assert_close(coords.cross[0], 15.0);
    assert_close(coords.cross[1], 15.0);
    assert_close(coords.cross[2], 15.0);
    assert_eq!(coords.rank_center, vec![10.0, 80.0, 150.0]);
    assert_eq!(coords.rank_extent, vec![20.0, 20.0, 20.0]);
}

#[test]
fn test_siblings_keep_separation() {
    let (lg, ordering) = layered(
        &boxes(&["A", "B", "C", "D"]),
        &[
            EdgeSpec::between("A", "B"),
            EdgeSpec::between("A", "C"),
            EdgeSpec::between("A", "D"),
        ],
    );
    let config = LayoutConfig::default();
    let coords = assign_coordinates(&lg, &ordering, &config);
    for w in ordering[1].windows(2) {
        let gap = coords.cross[w[1]] - coords.cross[w[0]];
        assert!(gap >= separation(&lg, w[0], w[1], &config) - EPS);
    }
    // The parent sits over the middle child.
    assert_close(coords.cross[0], coords.cross[ordering[1][1]]);
}

#[test]
fn test_min_length_stretches_rank_gap() {
    let (lg, ordering) = layered(
        &boxes(&["A", "B"]),
        &[EdgeSpec::between("A", "B").with_min_length(200.0)],
    );
    let coords = assign_coordinates(&lg, &ordering, &LayoutConfig::default());
    assert_eq!(coords.rank_center, vec![10.0, 230.0]);
}

// ─── Result assembly ─────────────────────────────────────────────────────────

#[test]
fn test_result_positions_tb() {
    let r = run(
        boxes(&["A", "B"]),
        vec![EdgeSpec::between("A", "B")],
        LayoutConfig::default(),
    );
    let a = r.node("A").unwrap();
    assert_close(a.x, 15.0);
    assert_close(a.y, 10.0);
    assert_eq!((a.rank, a.order), (0, 0));
    assert_close(r.width, 30.0);
    assert_close(r.height, 90.0);
    assert_eq!(r.rank_count, 2);

    let e = r.edge("A-B").unwrap();
    assert_eq!(e.source_point, Point::new(15.0, 20.0));
    assert_eq!(e.target_point, Point::new(15.0, 70.0));
    assert_eq!(e.points, vec![e.source_point, e.target_point]);
    assert_eq!(e.label_anchor, Point::new(15.0, 45.0));
    assert!(!e.reversed);
}

#[test]
fn test_result_positions_lr() {
    let r = run(
        boxes(&["A", "B"]),
        vec![EdgeSpec::between("A", "B")],
        LayoutConfig::default().with_direction(Direction::LR),
    );
    assert_eq!(r.center_of("A"), Some(Point::new(15.0, 10.0)));
    assert_eq!(r.center_of("B"), Some(Point::new(95.0, 10.0)));
    let e = r.edge("A-B").unwrap();
    assert_eq!(e.source_point, Point::new(30.0, 10.0));
    assert_eq!(e.target_point, Point::new(80.0, 10.0));
    assert_close(r.width, 110.0);
    assert_close(r.height, 20.0);
}

#[test]
fn test_margin_and_top_left_origin() {
    let config = LayoutConfig {
        margin: 5.0,
        origin: Origin::TopLeft,
        ..LayoutConfig::default()
    };
    let r = run(boxes(&["A", "B"]), vec![EdgeSpec::between("A", "B")], config);
    let a = r.node("A").unwrap();
    assert_close(a.x, 5.0);
    assert_close(a.y, 5.0);
    assert_eq!(r.center_of("A"), Some(Point::new(20.0, 15.0)));
    assert_close(r.width, 40.0);
    assert_close(r.height, 100.0);
}

#[test]
fn test_long_edge_bends_through_dummy() {
    let r = run(
        boxes(&["A", "B"]),
        vec![EdgeSpec::between("A", "B").with_minlen(2)],
        LayoutConfig::default(),
    );
    let e = r.edge("A-B").unwrap();
    assert_eq!(
        e.points,
        vec![
            Point::new(15.0, 20.0),
            Point::new(15.0, 70.0),
            Point::new(15.0, 120.0)
        ]
    );
    assert_eq!(e.label_anchor, Point::new(15.0, 70.0));
}

#[test]
fn test_reversed_edge_points_start_at_source() {
    let config = LayoutConfig {
        cycles: CyclePolicy::ReverseEdges,
        ..LayoutConfig::default()
    };
    let r = run(
        boxes(&["A", "B"]),
        vec![EdgeSpec::between("A", "B"), EdgeSpec::between("B", "A")],
        config,
    );
    let back = r.edge("B-A").unwrap();
    assert!(back.reversed);
    assert_eq!(back.source, "B");
    assert_eq!(back.points.first(), Some(&back.source_point));
    assert_close(back.source_point.y, 70.0);
    assert_close(back.target_point.y, 20.0);
    assert!(!r.edge("A-B").unwrap().reversed);
}

#[test]
fn test_self_loop_route() {
    let config = LayoutConfig {
        cycles: CyclePolicy::ReverseEdges,
        ..LayoutConfig::default()
    };
    let r = run(boxes(&["A"]), vec![EdgeSpec::between("A", "A")], config);
    let e = r.edge("A-A").unwrap();
    assert_eq!(
        e.points,
        vec![
            Point::new(7.5, 20.0),
            Point::new(7.5, 45.0),
            Point::new(22.5, 45.0),
            Point::new(22.5, 20.0)
        ]
    );
    assert_eq!(e.source_point, Point::new(7.5, 20.0));
    assert_close(r.height, 45.0);
    assert_close(r.width, 30.0);
}

#[test]
fn test_extra_width_widens_box_not_anchor() {
    let nodes = vec![
        NodeSpec::new("A", 30.0, 20.0).with_extra(20.0, 0.0),
        NodeSpec::new("B", 30.0, 20.0),
    ];
    let r = run(nodes, vec![EdgeSpec::between("A", "B")], LayoutConfig::default());
    let a = r.node("A").unwrap();
    assert_close(a.width, 50.0);
    assert_close(r.width, 50.0);
    assert_close(r.edge("A-B").unwrap().source_point.y, a.y + 10.0);
}

#[test]
fn test_empty_graph_result() {
    let r = run(vec![], vec![], LayoutConfig::default());
    assert!(r.nodes.is_empty());
    assert_eq!(r.width, 0.0);
    assert_eq!(r.height, 0.0);
}

// ─── Label anchor ────────────────────────────────────────────────────────────

#[test]
fn test_label_anchor_midpoint_by_arc_length() {
    let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
    assert_eq!(label_anchor(&pts), Point::new(10.0, 0.0));
    let pts = [Point::new(0.0, 0.0), Point::new(0.0, 40.0), Point::new(20.0, 40.0)];
    assert_eq!(label_anchor(&pts), Point::new(0.0, 30.0));
}

#[test]
fn test_label_anchor_degenerate() {
    assert_eq!(label_anchor(&[]), Point::default());
    let p = Point::new(3.0, 4.0);
    assert_eq!(label_anchor(&[p]), p);
    assert_eq!(label_anchor(&[p, p]), p);
}
