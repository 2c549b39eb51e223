//! Parameterized Vertex Cover: kernelization + bounded search tree.
//!
//! Pipeline for "is there a cover of size <= k?"
//! 1. VC1 drops vertices with no active neighbour.
//! 2. VC2 forces every vertex whose active degree exceeds the remaining budget.
//! 3. Branch on the first active edge `(u, v)` in lexicographic order: include `u`,
//!    otherwise include `v`. Depth is bounded by `k`, so the tree has at most 2^k
//!    leaves.
//!
//! The search works on the caller's graph through soft removal. Every vertex it
//! deactivates is recorded on a trail and restored before returning, on success
//! and failure alike.

use tracing::debug;

use crate::graph::Graph;

/// Find a vertex cover of size `<= k`, or `None` when none exists.
///
/// Kernel-forced vertices come first in the returned order, then branch choices.
pub fn vertex_cover(graph: &mut Graph, k: usize) -> Option<Vec<usize>> {
    let mut search = CoverSearch {
        graph,
        trail: Vec::new(),
    };
    let found = search.run(k);
    search.unwind();
    found
}

/// Smallest cover, found by raising `k` from zero.
pub fn minimum_vertex_cover(graph: &mut Graph) -> Vec<usize> {
    (0..=graph.vertex_count())
        .find_map(|k| vertex_cover(graph, k))
        .unwrap_or_default()
}

/// Whether `cover` touches every edge of `graph` (activity ignored).
pub fn is_vertex_cover(graph: &Graph, cover: &[usize]) -> bool {
    let mut chosen = vec![false; graph.vertex_count()];
    for &v in cover {
        chosen[v] = true;
    }
    (0..graph.vertex_count()).all(|u| chosen[u] || graph.neighbours(u).all(|w| chosen[w]))
}

struct CoverSearch<'g> {
    graph: &'g mut Graph,
    /// Vertices deactivated by this search, in removal order.
    trail: Vec<usize>,
}

impl CoverSearch<'_> {
    fn run(&mut self, k: usize) -> Option<Vec<usize>> {
        let isolated = self.graph.kernel_rule_isolated();
        self.trail.extend_from_slice(&isolated);

        let mut cover = Vec::new();
        let reduced = self.graph.kernel_rule_high_degree(k, &mut cover);
        self.trail.extend_from_slice(&cover);
        debug!(
            k,
            isolated = isolated.len(),
            forced = cover.len(),
            remaining = ?reduced,
            "vertex cover kernel"
        );

        let budget = reduced?;
        if self.branch(budget, &mut cover) {
            Some(cover)
        } else {
            None
        }
    }

    fn branch(&mut self, k: usize, cover: &mut Vec<usize>) -> bool {
        let Some((u, v)) = self.graph.first_active_edge() else {
            return true;
        };
        if k == 0 {
            return false;
        }
        for w in [u, v] {
            self.graph.remove_vertex(w);
            cover.push(w);
            if self.branch(k - 1, cover) {
                // Leave `w` removed; `unwind` restores it with the rest of the trail.
                self.trail.push(w);
                return true;
            }
            cover.pop();
            self.graph.restore_vertex(w);
        }
        false
    }

    fn unwind(&mut self) {
        for &v in self.trail.iter().rev() {
            self.graph.restore_vertex(v);
        }
        self.trail.clear();
    }
}
