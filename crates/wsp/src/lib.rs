//! Exact solvers for the Workflow Satisfiability Problem (WSP).
//!
//! A WSP instance is a set of ordered steps, a set of users, an authorization
//! relation (which users may perform which step) and pairwise SAME / DIFFERENT
//! constraints between steps. This crate decides and enumerates satisfying
//! step-to-user assignments with two independent exact strategies, and ships a
//! parameterized Vertex Cover solver built on the same soft-removal graph.
//!
//! Layout
//! - `graph`: undirected graph with soft vertex removal (+ kernel rules VC1/VC2)
//!   and the typed constraint layer used by WSP.
//! - `authorization`: the steps × users {0,1} matrix.
//! - `backtracking`: exhaustive assignment search (reference baseline).
//! - `pbt`: partition-based decomposition (set-partition enumeration, block→user
//!   matching, orchestration).
//! - `vertex_cover`: kernelization + bounded search tree.
//! - `instance`, `random`, `solve`: input model, random instances, unified entry point.
//!
//! All solvers are synchronous and single-threaded. Callers that need a deadline
//! run the call on a worker thread and abandon it.

pub mod api;
pub mod authorization;
pub mod backtracking;
pub mod error;
pub mod graph;
pub mod instance;
pub mod pbt;
pub mod random;
pub mod solve;
pub mod vertex_cover;

#[cfg(test)]
mod proptests;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Step-indexed user assignment: `encoding[s]` is the user performing step `s`.
pub type Encoding = Vec<usize>;

pub use authorization::AuthorizationMatrix;
pub use error::InstanceError;
pub use graph::{ConstraintGraph, ConstraintKind, Graph};
pub use instance::{Constraint, VcInstance, WspInstance};
pub use solve::{solve, SolveCfg, SolveReport, SolverKind};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::backtracking::WspBacktracking;
    pub use crate::pbt::{BlockUserMatching, Partition, PartitionGenerator, WspOrchestrator};
    pub use crate::vertex_cover::{minimum_vertex_cover, vertex_cover};
    pub use crate::{
        AuthorizationMatrix, Constraint, ConstraintGraph, ConstraintKind, Encoding, Graph,
        InstanceError, WspInstance,
    };
}
