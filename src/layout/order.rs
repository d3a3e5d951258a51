//! Crossing minimisation: order the vertices inside every rank.
//!
//! 1. Initial order by depth-first traversal from the top rank.
//! 2. Alternating down/up sweeps sorting each rank by the weighted median of
//!    its neighbours in the rank just processed.
//! 3. A transpose pass after every sweep swapping adjacent vertices while
//!    that strictly reduces crossings.
//!
//! The ordering with the fewest crossings seen is kept.

use super::normalize::LayerGraph;

/// Upper bound on transpose passes after each sweep.
pub const MAX_TRANSPOSE_PASSES: usize = 32;

/// Vertex ids per rank, in order along the cross axis.
pub type Ordering = Vec<Vec<usize>>;

/// Run the whole ordering phase.
pub fn minimise_crossings(lg: &LayerGraph, iterations: usize, seed: Option<u64>) -> Ordering {
    let mut ordering = initial_order(lg, seed);
    let mut positions = positions_of(lg, &ordering);
    transpose(lg, &mut ordering, &mut positions);

    let mut best = ordering.clone();
    let mut best_crossings = count_crossings(lg, &ordering);

    for iter in 0..iterations {
        if best_crossings == 0 {
            break;
        }
        let downward = iter % 2 == 0;
        sweep(lg, &mut ordering, &mut positions, downward);
        transpose(lg, &mut ordering, &mut positions);

        let crossings = count_crossings(lg, &ordering);
        tracing::trace!(iter, downward, crossings, "ordering sweep");
        if crossings < best_crossings {
            best_crossings = crossings;
            best = ordering.clone();
        }
    }

    tracing::debug!(crossings = best_crossings, "crossings minimised");
    best
}

/// First-visit order of a depth-first traversal.
///
/// Roots are the vertices with no upper neighbour, taken by (rank, id), or
/// shuffled with `seed` when one is given. Children are visited in segment
/// order.
pub fn initial_order(lg: &LayerGraph, seed: Option<u64>) -> Ordering {
    let mut ordering: Ordering = vec![Vec::new(); lg.rank_count];
    let mut visited = vec![false; lg.vertex_count()];

    let mut roots: Vec<usize> = (0..lg.vertex_count())
        .filter(|&v| lg.up[v].is_empty())
        .collect();
    roots.sort_by_key(|&v| (lg.vertices[v].rank, v));
    if let Some(seed) = seed {
        TieBreakRng::new(seed).shuffle(&mut roots);
    }

    let mut stack: Vec<usize> = Vec::new();
    for root in roots {
        stack.push(root);
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            ordering[lg.vertices[v].rank].push(v);
            let children: Vec<usize> = lg.lower_neighbors(v).collect();
            for &child in children.iter().rev() {
                if !visited[child] {
                    stack.push(child);
                }
            }
        }
    }
    ordering
}

/// Index of every vertex inside its rank.
pub fn positions_of(lg: &LayerGraph, ordering: &Ordering) -> Vec<usize> {
    let mut positions = vec![0usize; lg.vertex_count()];
    for rank in ordering {
        for (i, &v) in rank.iter().enumerate() {
            positions[v] = i;
        }
    }
    positions
}

fn sweep(lg: &LayerGraph, ordering: &mut Ordering, positions: &mut [usize], downward: bool) {
    let rank_count = ordering.len();
    if rank_count < 2 {
        return;
    }
    let ranks: Vec<usize> = if downward {
        (1..rank_count).collect()
    } else {
        (0..rank_count - 1).rev().collect()
    };

    for r in ranks {
        let medians: Vec<Option<f64>> = ordering[r]
            .iter()
            .map(|&v| {
                let mut neighbor_pos: Vec<f64> = if downward {
                    lg.upper_neighbors(v).map(|n| positions[n] as f64).collect()
                } else {
                    lg.lower_neighbors(v).map(|n| positions[n] as f64).collect()
                };
                median_value(&mut neighbor_pos)
            })
            .collect();
        sort_by_median(&mut ordering[r], &medians);
        for (i, &v) in ordering[r].iter().enumerate() {
            positions[v] = i;
        }
    }
}

/// Weighted median of neighbour positions (Gansner et al.).
///
/// Odd counts take the middle value; two values average; larger even counts
/// lean toward the side whose positions are packed more tightly.
pub fn median_value(positions: &mut [f64]) -> Option<f64> {
    if positions.is_empty() {
        return None;
    }
    positions.sort_by(f64::total_cmp);
    let len = positions.len();
    let m = len / 2;
    if len % 2 == 1 {
        return Some(positions[m]);
    }
    if len == 2 {
        return Some((positions[0] + positions[1]) / 2.0);
    }
    let left = positions[m - 1] - positions[0];
    let right = positions[len - 1] - positions[m];
    if left + right == 0.0 {
        return Some((positions[m - 1] + positions[m]) / 2.0);
    }
    Some((positions[m - 1] * right + positions[m] * left) / (left + right))
}

/// Stable sort of one rank by median. Vertices without a median keep their
/// slot; the others fill the remaining slots in median order, equal medians
/// keeping their existing relative order.
pub fn sort_by_median(rank: &mut [usize], medians: &[Option<f64>]) {
    let mut movable: Vec<(f64, usize)> = rank
        .iter()
        .zip(medians)
        .filter_map(|(&v, m)| m.map(|m| (m, v)))
        .collect();
    movable.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut sorted = movable.into_iter().map(|(_, v)| v);
    for (slot, m) in rank.iter_mut().zip(medians) {
        if m.is_some() {
            if let Some(v) = sorted.next() {
                *slot = v;
            }
        }
    }
}

/// Crossings between edges of `u` and edges of `v` when `u` is left of `v`,
/// counted against both adjacent ranks.
fn pair_crossings(lg: &LayerGraph, positions: &[usize], u: usize, v: usize) -> usize {
    let mut total = 0;
    for upper in [true, false] {
        let nu: Vec<usize> = if upper {
            lg.upper_neighbors(u).map(|n| positions[n]).collect()
        } else {
            lg.lower_neighbors(u).map(|n| positions[n]).collect()
        };
        let nv: Vec<usize> = if upper {
            lg.upper_neighbors(v).map(|n| positions[n]).collect()
        } else {
            lg.lower_neighbors(v).map(|n| positions[n]).collect()
        };
        for &a in &nu {
            total += nv.iter().filter(|&&b| a > b).count();
        }
    }
    total
}

/// Swap adjacent vertices while that strictly reduces crossings.
pub fn transpose(lg: &LayerGraph, ordering: &mut Ordering, positions: &mut [usize]) {
    for _ in 0..MAX_TRANSPOSE_PASSES {
        let mut improved = false;
        for rank in ordering.iter_mut() {
            for i in 0..rank.len().saturating_sub(1) {
                let (u, v) = (rank[i], rank[i + 1]);
                let keep = pair_crossings(lg, positions, u, v);
                let swap = pair_crossings(lg, positions, v, u);
                if swap < keep {
                    rank.swap(i, i + 1);
                    positions[u] = i + 1;
                    positions[v] = i;
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
}

/// Total number of segment crossings between all pairs of adjacent ranks.
pub fn count_crossings(lg: &LayerGraph, ordering: &Ordering) -> usize {
    let positions = positions_of(lg, ordering);
    let mut total = 0usize;
    for rank in ordering.iter().take(ordering.len().saturating_sub(1)) {
        let mut edges: Vec<(usize, usize)> = Vec::new();
        for &v in rank {
            for n in lg.lower_neighbors(v) {
                edges.push((positions[v], positions[n]));
            }
        }
        for i in 0..edges.len() {
            for j in (i + 1)..edges.len() {
                let (ei0, ei1) = edges[i];
                let (ej0, ej1) = edges[j];
                if (ei0 < ej0 && ei1 > ej1) || (ei0 > ej0 && ei1 < ej1) {
                    total += 1;
                }
            }
        }
    }
    total
}

/// Small xorshift generator for seeded tie-breaking; same seed, same order.
struct TieBreakRng {
    state: u64,
}

impl TieBreakRng {
    /// Xorshift sticks at 0, so every seed maps to a non-zero state.
    fn new(seed: u64) -> Self {
        const MIX: u64 = 0x9E37_79B9_7F4A_7C15;
        let state = seed ^ MIX;
        Self {
            state: if state == 0 { MIX } else { state },
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = (self.next_u64() % (i as u64 + 1)) as usize;
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_order.rs"]
mod tests;
