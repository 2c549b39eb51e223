//! Exhaustive assignment search (reference baseline).
//!
//! Steps are assigned in index order; at step `s` the authorized users are tried
//! in ascending order and each tentative choice is checked against the assigned
//! prefix with `ConstraintGraph::validate_extension`. Every complete, valid leaf
//! is emitted, so the search enumerates *all* satisfying assignments.
//!
//! The recursion is unrolled into an explicit frame stack (one candidate cursor
//! per step) so deep workflows do not grow the native call stack. Branch order is
//! identical to the recursive formulation.

use tracing::debug;

use crate::authorization::AuthorizationMatrix;
use crate::error::InstanceError;
use crate::graph::ConstraintGraph;
use crate::Encoding;

/// Backtracking solver over a constraint graph and an authorization matrix.
#[derive(Clone, Copy, Debug)]
pub struct WspBacktracking<'a> {
    graph: &'a ConstraintGraph,
    auth: &'a AuthorizationMatrix,
}

impl<'a> WspBacktracking<'a> {
    /// Fails fast when the graph and the matrix disagree on the step count.
    pub fn new(graph: &'a ConstraintGraph, auth: &'a AuthorizationMatrix) -> Result<Self, InstanceError> {
        if graph.num_steps() != auth.num_steps() {
            return Err(InstanceError::DimensionMismatch {
                what: "constraint graph steps vs authorization rows",
                expected: auth.num_steps(),
                found: graph.num_steps(),
            });
        }
        Ok(Self { graph, auth })
    }

    /// Lazy stream of every satisfying encoding, in lexicographic order.
    pub fn solutions(&self) -> Solutions<'a> {
        Solutions::new(self.graph, self.auth)
    }

    /// Collect every satisfying encoding. Empty means UNSAT.
    pub fn solve_all(&self) -> Vec<Encoding> {
        self.solutions().collect()
    }

    /// First satisfying encoding in search order.
    pub fn first(&self) -> Option<Encoding> {
        self.solutions().next()
    }
}

/// Iterator driving the depth-first search.
///
/// `encoding[..depth]` is the assigned prefix; `cursors[s]` is the next user to
/// try at step `s`.
#[derive(Clone, Debug)]
pub struct Solutions<'a> {
    graph: &'a ConstraintGraph,
    auth: &'a AuthorizationMatrix,
    encoding: Vec<usize>,
    cursors: Vec<usize>,
    depth: usize,
    done: bool,
}

impl<'a> Solutions<'a> {
    fn new(graph: &'a ConstraintGraph, auth: &'a AuthorizationMatrix) -> Self {
        let n = graph.num_steps();
        let empty = auth.empty_steps();
        if !empty.is_empty() {
            debug!(steps = ?empty, "authorization-empty steps, instance is UNSAT");
        }
        Self {
            graph,
            auth,
            encoding: vec![0; n],
            cursors: vec![0; n],
            depth: 0,
            done: !empty.is_empty(),
        }
    }

    /// Advance the cursor at step `s` to the next authorized, consistent user.
    fn advance(&mut self, s: usize) -> bool {
        let num_users = self.auth.num_users();
        while self.cursors[s] < num_users {
            let u = self.cursors[s];
            self.cursors[s] += 1;
            if !self.auth.is_authorized(s, u) {
                continue;
            }
            // No undo needed: validation only reads indices <= s and the slot is
            // overwritten by the next candidate.
            self.encoding[s] = u;
            if self.graph.validate_extension(&self.encoding, s) {
                return true;
            }
        }
        false
    }
}

impl Iterator for Solutions<'_> {
    type Item = Encoding;

    fn next(&mut self) -> Option<Encoding> {
        let n = self.encoding.len();
        while !self.done {
            if self.depth == n {
                let leaf = self.encoding.clone();
                match self.depth.checked_sub(1) {
                    Some(d) => self.depth = d,
                    None => self.done = true,
                }
                return Some(leaf);
            }
            let s = self.depth;
            if self.advance(s) {
                self.depth += 1;
                if self.depth < n {
                    self.cursors[self.depth] = 0;
                }
            } else if s == 0 {
                self.done = true;
            } else {
                self.depth -= 1;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ConstraintKind;

    fn auth(rows: &[[u8; 3]]) -> AuthorizationMatrix {
        AuthorizationMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn same_constraint_enumerates_every_solution() {
        let mut g = ConstraintGraph::new(3);
        g.add_constraint_edge(0, 1, ConstraintKind::Same);
        let a = auth(&[[1, 1, 0], [1, 1, 1], [0, 1, 1]]);
        let sols = WspBacktracking::new(&g, &a).unwrap().solve_all();
        // Includes [0, 0, 1] and [1, 1, 2]; the other two are equally valid.
        assert_eq!(
            sols,
            vec![vec![0, 0, 1], vec![0, 0, 2], vec![1, 1, 1], vec![1, 1, 2]]
        );
    }

    #[test]
    fn diagonal_authorization_single_solution() {
        let mut g = ConstraintGraph::new(3);
        g.add_constraint_edge(0, 1, ConstraintKind::Different);
        let a = auth(&[[1, 0, 0], [0, 1, 0], [0, 0, 1]]);
        let bt = WspBacktracking::new(&g, &a).unwrap();
        assert_eq!(bt.solve_all(), vec![vec![0, 1, 2]]);
        assert_eq!(bt.first(), Some(vec![0, 1, 2]));
    }

    #[test]
    fn conflicting_constraints_are_unsat() {
        let mut g = ConstraintGraph::new(3);
        g.add_constraint_edge(0, 1, ConstraintKind::Same);
        g.add_constraint_edge(1, 2, ConstraintKind::Same);
        g.add_constraint_edge(0, 2, ConstraintKind::Different);
        let a = AuthorizationMatrix::full(3, 3).unwrap();
        let bt = WspBacktracking::new(&g, &a).unwrap();
        assert!(bt.solve_all().is_empty());
        assert_eq!(bt.first(), None);
    }

    #[test]
    fn empty_authorization_row_short_circuits() {
        let g = ConstraintGraph::new(2);
        let a = auth(&[[1, 1, 1], [0, 0, 0]]);
        let mut it = WspBacktracking::new(&g, &a).unwrap().solutions();
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn single_step_lists_authorized_users() {
        let g = ConstraintGraph::new(1);
        let a = auth(&[[1, 0, 1]]);
        let sols = WspBacktracking::new(&g, &a).unwrap().solve_all();
        assert_eq!(sols, vec![vec![0], vec![2]]);
    }

    #[test]
    fn unconstrained_count_is_product_of_row_sizes() {
        let g = ConstraintGraph::new(3);
        let a = auth(&[[1, 1, 0], [1, 1, 1], [0, 1, 1]]);
        let bt = WspBacktracking::new(&g, &a).unwrap();
        assert_eq!(bt.solutions().count(), 2 * 3 * 2);
        assert_eq!(bt.solutions().take(2).count(), 2);
    }

    #[test]
    fn dimension_mismatch_fails_fast() {
        let g = ConstraintGraph::new(2);
        let a = auth(&[[1, 1, 1]]);
        assert!(matches!(
            WspBacktracking::new(&g, &a),
            Err(InstanceError::DimensionMismatch { expected: 1, found: 2, .. })
        ));
    }
}
