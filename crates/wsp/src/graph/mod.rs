//! Undirected graphs with soft vertex removal, plus the WSP constraint layer.
//!
//! Purpose
//! - `Graph` keeps a fixed vertex universe with sorted adjacency sets and a
//!   per-vertex activity flag. Removing a vertex only flips the flag, so a
//!   branch-and-bound search can "mutate, recurse, undo" without copying.
//! - `ConstraintGraph` embeds a `Graph` and adds a SAME / DIFFERENT label per
//!   unordered step pair.
//!
//! Determinism
//! - Adjacency is stored in `BTreeSet`s, so neighbour and edge iteration are
//!   ascending. Vertex Cover edge selection depends on this order.

mod base;
mod constraint;

pub use base::Graph;
pub use constraint::{ConstraintGraph, ConstraintKind};
