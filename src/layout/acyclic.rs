//! Cycle handling ahead of rank assignment.
//!
//! Two policies:
//!   - `Reject`: report every edge that sits on a cycle as `CyclicGraph`.
//!   - `ReverseEdges`: pick a feedback arc set with the greedy-FAS heuristic
//!     (Eades, Lin & Smyth) and rank those edges reversed. Self loops never
//!     constrain ranks and are set aside.
//!
//! The result is a `Dag` whose node indices coincide with the layout graph's.

use std::collections::HashSet;

use petgraph::Direction as EdgeDir;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::graph::LayoutGraph;
use crate::config::CyclePolicy;
use crate::error::{LayoutError, Result};

/// An edge of the ranking DAG.
#[derive(Debug, Clone, PartialEq)]
pub struct DagEdge {
    /// Edge in the layout graph this one stands for.
    pub edge: EdgeIndex,
    pub minlen: usize,
    pub weight: f64,
    pub min_length: f64,
    /// True when it points from the input target to the input source.
    pub reversed: bool,
}

/// The acyclic graph that rank assignment and later phases run on.
pub struct Dag {
    pub graph: DiGraph<(), DagEdge>,
    /// Self loops of the layout graph, excluded from `graph`.
    pub self_loops: Vec<EdgeIndex>,
}

impl Dag {
    pub fn reversed_count(&self) -> usize {
        self.graph
            .edge_weights()
            .filter(|e| e.reversed)
            .count()
    }
}

/// Turn the layout graph into a ranking DAG according to `policy`.
pub fn make_acyclic(g: &LayoutGraph, policy: CyclePolicy) -> Result<Dag> {
    let reversed: HashSet<EdgeIndex> = match policy {
        CyclePolicy::Reject => {
            let cyclic = cyclic_edges(g);
            if !cyclic.is_empty() {
                return Err(LayoutError::CyclicGraph {
                    edges: cyclic
                        .into_iter()
                        .map(|e| g.digraph[e].id.clone())
                        .collect(),
                });
            }
            HashSet::new()
        }
        CyclePolicy::ReverseEdges => feedback_edges(g),
    };

    let mut graph: DiGraph<(), DagEdge> =
        DiGraph::with_capacity(g.node_count(), g.edge_count());
    for _ in g.digraph.node_indices() {
        graph.add_node(());
    }

    let mut self_loops = Vec::new();
    for edge in g.digraph.edge_references() {
        let (src, tgt) = (edge.source(), edge.target());
        if src == tgt {
            self_loops.push(edge.id());
            continue;
        }
        let data = edge.weight();
        let is_reversed = reversed.contains(&edge.id());
        let (from, to) = if is_reversed { (tgt, src) } else { (src, tgt) };
        graph.add_edge(
            from,
            to,
            DagEdge {
                edge: edge.id(),
                minlen: data.minlen,
                weight: data.weight,
                min_length: data.min_length,
                reversed: is_reversed,
            },
        );
    }

    Ok(Dag { graph, self_loops })
}

/// Every edge lying on a directed cycle, in input order.
///
/// An edge is on a cycle iff both endpoints share a non-trivial strongly
/// connected component, or it is a self loop.
pub fn cyclic_edges(g: &LayoutGraph) -> Vec<EdgeIndex> {
    let mut component = vec![usize::MAX; g.node_count()];
    for (i, scc) in tarjan_scc(&g.digraph).into_iter().enumerate() {
        if scc.len() > 1 {
            for n in scc {
                component[n.index()] = i;
            }
        }
    }

    g.digraph
        .edge_references()
        .filter(|e| {
            let (s, t) = (e.source().index(), e.target().index());
            s == t || (component[s] != usize::MAX && component[s] == component[t])
        })
        .map(|e| e.id())
        .collect()
}

/// Edges to reverse so the graph becomes acyclic (self loops excluded).
pub fn feedback_edges(g: &LayoutGraph) -> HashSet<EdgeIndex> {
    let ordering = greedy_fas_ordering(g);
    let mut position = vec![0usize; g.node_count()];
    for (i, n) in ordering.iter().enumerate() {
        position[n.index()] = i;
    }
    g.digraph
        .edge_references()
        .filter(|e| {
            e.source() != e.target() && position[e.source().index()] > position[e.target().index()]
        })
        .map(|e| e.id())
        .collect()
}

/// Compute a node ordering using the greedy-FAS heuristic.
///
/// Sinks are peeled to the back, sources to the front; when neither exists
/// the node with the largest out-degree minus in-degree goes to the front.
/// Ties resolve to the lowest node index, so the ordering is deterministic.
pub fn greedy_fas_ordering(g: &LayoutGraph) -> Vec<NodeIndex> {
    let n = g.node_count();
    let mut active = vec![true; n];
    let mut remaining = n;
    let mut out_deg = vec![0i64; n];
    let mut in_deg = vec![0i64; n];

    for edge in g.digraph.edge_references() {
        if edge.source() == edge.target() {
            continue;
        }
        out_deg[edge.source().index()] += 1;
        in_deg[edge.target().index()] += 1;
    }

    let mut s1: Vec<NodeIndex> = Vec::new();
    let mut s2: Vec<NodeIndex> = Vec::new();

    let remove = |v: NodeIndex,
                  active: &mut Vec<bool>,
                  out_deg: &mut Vec<i64>,
                  in_deg: &mut Vec<i64>| {
        active[v.index()] = false;
        for e in g.digraph.edges_directed(v, EdgeDir::Outgoing) {
            let w = e.target();
            if w != v && active[w.index()] {
                in_deg[w.index()] -= 1;
            }
        }
        for e in g.digraph.edges_directed(v, EdgeDir::Incoming) {
            let u = e.source();
            if u != v && active[u.index()] {
                out_deg[u.index()] -= 1;
            }
        }
    };

    while remaining > 0 {
        let mut changed = true;
        while changed {
            changed = false;
            for v in g.digraph.node_indices() {
                if active[v.index()] && out_deg[v.index()] == 0 {
                    remove(v, &mut active, &mut out_deg, &mut in_deg);
                    s2.push(v);
                    remaining -= 1;
                    changed = true;
                }
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for v in g.digraph.node_indices() {
                if active[v.index()] && in_deg[v.index()] == 0 {
                    remove(v, &mut active, &mut out_deg, &mut in_deg);
                    s1.push(v);
                    remaining -= 1;
                    changed = true;
                }
            }
        }

        let best = g
            .digraph
            .node_indices()
            .filter(|v| active[v.index()])
            .fold(None, |best: Option<NodeIndex>, v| match best {
                Some(b) if out_deg[b.index()] - in_deg[b.index()]
                    >= out_deg[v.index()] - in_deg[v.index()] =>
                {
                    Some(b)
                }
                _ => Some(v),
            });
        if let Some(best) = best {
            remove(best, &mut active, &mut out_deg, &mut in_deg);
            s1.push(best);
            remaining -= 1;
        }
    }

    s2.reverse();
    s1.extend(s2);
    s1
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_acyclic.rs"]
mod tests;
