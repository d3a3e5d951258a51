//! Rank assignment.
//!
//! Longest path from the sources gives every node the lowest rank its
//! incoming `minlen` constraints allow. The `Tight` ranker then shortens
//! edges: a node whose outgoing weight outweighs its incoming weight slides
//! down to the top of its feasible interval, and vice versa. Each move
//! strictly lowers the weighted edge-length sum, so the loop terminates.

use petgraph::Direction as EdgeDir;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use super::acyclic::{Dag, DagEdge};
use crate::config::Ranker;

/// Upper bound on tightening sweeps.
const MAX_TIGHTEN_PASSES: usize = 64;

/// Rank of every node, indexed by `NodeIndex::index()`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankAssignment {
    pub ranks: Vec<usize>,
    pub rank_count: usize,
}

impl RankAssignment {
    pub fn assign(dag: &Dag, ranker: Ranker, preserve_gaps: bool) -> Self {
        let order = topological(dag);
        let mut ranks = longest_path(dag, &order);
        if ranker == Ranker::Tight {
            tighten(dag, &order, &mut ranks);
        }
        let ranks = normalize_ranks(dag, ranks, preserve_gaps);
        let rank_count = if ranks.is_empty() {
            1
        } else {
            ranks.iter().copied().max().unwrap_or(0) as usize + 1
        };
        tracing::debug!(rank_count, ?ranker, "ranks assigned");
        Self {
            ranks: ranks.into_iter().map(|r| r as usize).collect(),
            rank_count,
        }
    }

    pub fn rank_of(&self, node: NodeIndex) -> usize {
        self.ranks[node.index()]
    }
}

/// Topological order of the DAG. The DAG is acyclic by construction.
fn topological(dag: &Dag) -> Vec<NodeIndex> {
    match toposort(&dag.graph, None) {
        Ok(order) => order,
        Err(cycle) => unreachable!("ranking DAG has a cycle at {:?}", cycle.node_id()),
    }
}

/// Rank distance an edge demands.
fn span(edge: &DagEdge) -> i64 {
    i64::try_from(edge.minlen).unwrap_or(i64::MAX)
}

/// Sources get rank 0; every other node `max(rank(pred) + minlen)`.
pub fn longest_path(dag: &Dag, order: &[NodeIndex]) -> Vec<i64> {
    let mut ranks = vec![0i64; dag.graph.node_count()];
    for &v in order {
        let rank = dag
            .graph
            .edges_directed(v, EdgeDir::Incoming)
            .map(|e| ranks[e.source().index()].saturating_add(span(e.weight())))
            .max()
            .unwrap_or(0);
        ranks[v.index()] = rank;
    }
    ranks
}

/// Move single nodes within their feasible interval while that strictly
/// shortens the weighted total edge length.
pub fn tighten(dag: &Dag, order: &[NodeIndex], ranks: &mut [i64]) {
    for pass in 0..MAX_TIGHTEN_PASSES {
        let mut moved = 0usize;
        for &v in order {
            let mut lower: Option<i64> = None;
            let mut w_in = 0.0;
            for e in dag.graph.edges_directed(v, EdgeDir::Incoming) {
                let bound = ranks[e.source().index()].saturating_add(span(e.weight()));
                lower = Some(lower.map_or(bound, |l| l.max(bound)));
                w_in += e.weight().weight;
            }
            let mut upper: Option<i64> = None;
            let mut w_out = 0.0;
            for e in dag.graph.edges_directed(v, EdgeDir::Outgoing) {
                let bound = ranks[e.target().index()].saturating_sub(span(e.weight()));
                upper = Some(upper.map_or(bound, |u| u.min(bound)));
                w_out += e.weight().weight;
            }

            let current = ranks[v.index()];
            let target = if w_out > w_in {
                upper.filter(|&u| u > current)
            } else if w_in > w_out {
                lower.filter(|&l| l < current)
            } else {
                None
            };
            if let Some(target) = target {
                ranks[v.index()] = target;
                moved += 1;
            }
        }
        tracing::trace!(pass, moved, "tighten pass");
        if moved == 0 {
            break;
        }
    }
}

/// Shift ranks so the minimum is 0 and, unless `preserve_gaps` is set, drop
/// ranks that hold no node and lie strictly inside no edge.
///
/// Dropping such a rank shifts only nodes on one side of it, and no edge
/// crosses it, so every `minlen` constraint still holds.
pub fn normalize_ranks(dag: &Dag, mut ranks: Vec<i64>, preserve_gaps: bool) -> Vec<i64> {
    let Some(&min) = ranks.iter().min() else {
        return ranks;
    };
    for r in ranks.iter_mut() {
        *r -= min;
    }
    if preserve_gaps {
        return ranks;
    }

    let max = ranks.iter().copied().max().unwrap_or(0) as usize;
    let mut used = vec![false; max + 1];
    for &r in &ranks {
        used[r as usize] = true;
    }
    for e in dag.graph.edge_references() {
        let (a, b) = (ranks[e.source().index()], ranks[e.target().index()]);
        for r in (a + 1)..b {
            used[r as usize] = true;
        }
    }

    let mut remap = vec![0i64; max + 1];
    let mut next = 0i64;
    for (r, &is_used) in used.iter().enumerate() {
        remap[r] = next;
        if is_used {
            next += 1;
        }
    }
    ranks.into_iter().map(|r| remap[r as usize]).collect()
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_rank.rs"]
mod tests;
