//! Adjacency + activity structure and the Vertex Cover kernel rules.

use std::collections::BTreeSet;

/// Undirected graph over vertices `0..vertex_count()` with soft removal.
///
/// Edges are never physically deleted; every query that mentions "active"
/// ignores vertices whose flag is cleared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    adj: Vec<BTreeSet<usize>>,
    active: Vec<bool>,
}

impl Graph {
    /// Graph with `n` active vertices and no edges.
    pub fn new(n: usize) -> Self {
        Self {
            adj: vec![BTreeSet::new(); n],
            active: vec![true; n],
        }
    }

    /// Size of the vertex universe (active or not).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.adj.len()
    }

    /// Symmetric insert. Endpoints must be distinct and `< vertex_count()`
    /// (indexing panics otherwise).
    pub fn add_edge(&mut self, u: usize, v: usize) {
        self.adj[u].insert(v);
        self.adj[v].insert(u);
    }

    /// All neighbours of `u` in ascending order, ignoring activity.
    pub fn neighbours(&self, u: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj[u].iter().copied()
    }

    #[inline]
    pub fn is_active(&self, u: usize) -> bool {
        self.active[u]
    }

    /// Number of active neighbours; 0 when `u` itself is inactive.
    pub fn degree_active(&self, u: usize) -> usize {
        if !self.active[u] {
            return 0;
        }
        self.adj[u].iter().filter(|&&w| self.active[w]).count()
    }

    /// Idempotent soft removal.
    #[inline]
    pub fn remove_vertex(&mut self, u: usize) {
        self.active[u] = false;
    }

    /// Idempotent restore.
    #[inline]
    pub fn restore_vertex(&mut self, u: usize) {
        self.active[u] = true;
    }

    /// Count of currently active vertices.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Every unordered pair `(u, v)` with `u < v` and both endpoints active,
    /// in lexicographic order.
    pub fn active_edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for u in 0..self.adj.len() {
            if !self.active[u] {
                continue;
            }
            for &v in self.adj[u].range(u + 1..) {
                if self.active[v] {
                    edges.push((u, v));
                }
            }
        }
        edges
    }

    /// First element of `active_edges()` without materializing the list.
    pub fn first_active_edge(&self) -> Option<(usize, usize)> {
        (0..self.adj.len())
            .filter(|&u| self.active[u])
            .find_map(|u| {
                self.adj[u]
                    .range(u + 1..)
                    .find(|&&v| self.active[v])
                    .map(|&v| (u, v))
            })
    }

    /// Active vertex of maximum active degree; lowest index wins ties.
    pub fn highest_degree(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for u in 0..self.adj.len() {
            if !self.active[u] {
                continue;
            }
            let deg = self.degree_active(u);
            if best.map_or(true, |(_, d)| deg > d) {
                best = Some((u, deg));
            }
        }
        best.map(|(u, _)| u)
    }

    /// VC1: deactivate every active vertex with zero active degree.
    ///
    /// Returns the removed vertices so the caller can restore them later.
    pub fn kernel_rule_isolated(&mut self) -> Vec<usize> {
        let isolated: Vec<usize> = (0..self.adj.len())
            .filter(|&u| self.active[u] && self.degree_active(u) == 0)
            .collect();
        for &u in &isolated {
            self.active[u] = false;
        }
        isolated
    }

    /// VC2: while the active vertex of maximum degree has degree `> k`, force it
    /// into `cover`, deactivate it and decrement `k`.
    ///
    /// Returns the remaining budget, or `None` once a forced vertex would push it
    /// below zero (no cover of size `<= k` exists). Forced vertices stay appended
    /// to `cover` and deactivated in both cases.
    pub fn kernel_rule_high_degree(&mut self, mut k: usize, cover: &mut Vec<usize>) -> Option<usize> {
        while let Some(z) = self.highest_degree() {
            if self.degree_active(z) <= k {
                break;
            }
            cover.push(z);
            self.active[z] = false;
            k = k.checked_sub(1)?;
        }
        Some(k)
    }
}
