//! Typed SAME / DIFFERENT constraint edges over workflow steps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::base::Graph;

/// Kind of a pairwise step constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    /// Binding of duty: both steps are performed by the same user.
    Same,
    /// Separation of duty: the steps are performed by distinct users.
    Different,
}

impl ConstraintKind {
    /// Whether a pair of chosen users satisfies this constraint.
    #[inline]
    pub fn holds(self, a: usize, b: usize) -> bool {
        match self {
            ConstraintKind::Same => a == b,
            ConstraintKind::Different => a != b,
        }
    }
}

/// Step graph whose edges carry a `ConstraintKind`.
///
/// The base `Graph` holds plain adjacency; `kinds[u]` maps each constrained
/// partner of `u` to the edge label. At most one kind per pair: re-adding a pair
/// overwrites it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstraintGraph {
    base: Graph,
    kinds: Vec<BTreeMap<usize, ConstraintKind>>,
}

impl ConstraintGraph {
    pub fn new(num_steps: usize) -> Self {
        Self {
            base: Graph::new(num_steps),
            kinds: vec![BTreeMap::new(); num_steps],
        }
    }

    #[inline]
    pub fn num_steps(&self) -> usize {
        self.kinds.len()
    }

    /// Underlying adjacency (constraint edges without labels).
    pub fn graph(&self) -> &Graph {
        &self.base
    }

    /// Symmetric insert; last write wins for a pair.
    pub fn add_constraint_edge(&mut self, u: usize, v: usize, kind: ConstraintKind) {
        self.base.add_edge(u, v);
        self.kinds[u].insert(v, kind);
        self.kinds[v].insert(u, kind);
    }

    /// Label of the pair, `None` when unconstrained.
    #[inline]
    pub fn constraint_kind(&self, u: usize, v: usize) -> Option<ConstraintKind> {
        self.kinds[u].get(&v).copied()
    }

    /// Constrained partners of `s` with their labels, ascending by step.
    pub fn partners(&self, s: usize) -> impl Iterator<Item = (usize, ConstraintKind)> + '_ {
        self.kinds[s].iter().map(|(&t, &k)| (t, k))
    }

    /// Steps bound to `s` by a SAME edge.
    pub fn same_partners(&self, s: usize) -> impl Iterator<Item = usize> + '_ {
        self.partners(s)
            .filter(|&(_, k)| k == ConstraintKind::Same)
            .map(|(t, _)| t)
    }

    /// Every constrained pair once, as `(i, j, kind)` with `i < j`.
    pub fn constraint_edges(&self) -> Vec<(usize, usize, ConstraintKind)> {
        let mut out = Vec::new();
        for (i, row) in self.kinds.iter().enumerate() {
            for (&j, &kind) in row.range(i + 1..) {
                out.push((i, j, kind));
            }
        }
        out
    }

    /// Check step `s` against the already-assigned prefix `encoding[..s]`.
    ///
    /// Only indices `<= s` are read, so slots past `s` may hold stale values.
    pub fn validate_extension(&self, encoding: &[usize], s: usize) -> bool {
        let user = encoding[s];
        self.kinds[s]
            .range(..s)
            .all(|(&i, &kind)| kind.holds(encoding[i], user))
    }

    /// Full check of a complete encoding against every constraint edge.
    pub fn is_satisfied_by(&self, encoding: &[usize]) -> bool {
        encoding.len() == self.num_steps()
            && (0..encoding.len()).all(|s| self.validate_extension(encoding, s))
    }
}
