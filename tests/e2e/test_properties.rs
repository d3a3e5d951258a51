//! Property-based invariant tests for the layout pipeline.
//!
//! For random DAGs with random node sizes:
//!
//! 1. Every edge spans at least its `minlen` ranks.
//! 2. Neighbours within a rank keep `node_separation` plus half their sizes.
//! 3. The same input and config always give the same result.
//! 4. Edge polylines start and end at their anchors.

use layered_layout::{
    Direction, EdgeSpec, GraphInput, LayoutConfig, LayoutResult, NodeSpec, layout,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const EPS: f64 = 1e-6;

/// Random DAG: edges always point from a lower to a higher node index.
fn dag_strategy() -> impl Strategy<Value = GraphInput> {
    (1usize..10)
        .prop_flat_map(|n| {
            let sizes = prop::collection::vec((10.0f64..120.0, 10.0f64..80.0), n);
            let edges = prop::collection::vec((0..n, 0..n, 1usize..4), 0..(n * 2));
            (sizes, edges)
        })
        .prop_map(|(sizes, raw_edges)| {
            let nodes: Vec<NodeSpec> = sizes
                .iter()
                .enumerate()
                .map(|(i, &(w, h))| NodeSpec::new(format!("n{i}"), w, h))
                .collect();
            let edges: Vec<EdgeSpec> = raw_edges
                .into_iter()
                .filter(|(a, b, _)| a != b)
                .enumerate()
                .map(|(k, (a, b, minlen))| {
                    let (lo, hi) = (a.min(b), a.max(b));
                    EdgeSpec::new(format!("e{k}"), format!("n{lo}"), format!("n{hi}"))
                        .with_minlen(minlen)
                })
                .collect();
            GraphInput::new(nodes, edges)
        })
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::TB), Just(Direction::LR)]
}

/// Center and size of a node along the cross axis.
fn cross_of(r: &LayoutResult, id: &str) -> (f64, f64) {
    let node = r.node(id).unwrap();
    let center = node.center(r.origin);
    match r.direction {
        Direction::TB => (center.x, node.width),
        Direction::LR => (center.y, node.height),
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. minlen holds on every edge
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edges_respect_minlen(input in dag_strategy(), dir in direction_strategy()) {
        let r = layout(&input, &LayoutConfig::default().with_direction(dir)).unwrap();
        for e in &input.edges {
            let from = r.node(&e.source).unwrap().rank;
            let to = r.node(&e.target).unwrap().rank;
            let minlen = e.minlen.unwrap_or(1);
            prop_assert!(to >= from + minlen, "edge {} spans {} < {}", e.id, to as i64 - from as i64, minlen);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Separation within a rank
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn neighbours_keep_separation(input in dag_strategy(), dir in direction_strategy()) {
        let config = LayoutConfig::default().with_direction(dir);
        let r = layout(&input, &config).unwrap();
        for rank in 0..r.rank_count {
            let mut members: Vec<&str> = r
                .nodes
                .iter()
                .filter(|n| n.rank == rank)
                .map(|n| n.id.as_str())
                .collect();
            members.sort_by_key(|id| r.node(id).unwrap().order);
            for pair in members.windows(2) {
                let (c0, s0) = cross_of(&r, pair[0]);
                let (c1, s1) = cross_of(&r, pair[1]);
                let required = (s0 + s1) / 2.0 + config.node_separation;
                prop_assert!(
                    c1 - c0 >= required - EPS,
                    "{} and {} are {} apart, need {}",
                    pair[0], pair[1], c1 - c0, required
                );
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_is_deterministic(input in dag_strategy(), seed in proptest::option::of(any::<u64>())) {
        let config = LayoutConfig { seed, ..LayoutConfig::default() };
        let first = layout(&input, &config).unwrap();
        let second = layout(&input, &config).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Polylines run anchor to anchor
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn polylines_end_at_anchors(input in dag_strategy()) {
        let r = layout(&input, &LayoutConfig::default()).unwrap();
        prop_assert_eq!(r.edges.len(), input.edges.len());
        for e in &r.edges {
            prop_assert!(e.points.len() >= 2);
            prop_assert_eq!(e.points.first(), Some(&e.source_point));
            prop_assert_eq!(e.points.last(), Some(&e.target_point));
            // TB: the polyline never goes back up.
            for w in e.points.windows(2) {
                prop_assert!(w[1].y >= w[0].y - EPS);
            }
        }
    }
}
