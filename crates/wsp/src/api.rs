//! Curated surface for the CLI and benches.
//!
//! Flat re-exports of the solver entry points so callers need one import path.

pub use crate::authorization::AuthorizationMatrix;
pub use crate::backtracking::{Solutions, WspBacktracking};
pub use crate::graph::{ConstraintGraph, ConstraintKind, Graph};
pub use crate::instance::{Constraint, VcInstance, WspInstance};
pub use crate::pbt::{
    authorize_partition, BlockUserMatching, OrchestratorReport, Partition, PartitionGenerator,
    WspOrchestrator,
};
pub use crate::random::{InstanceGenerator, RandomInstanceParams, SeedReplay};
pub use crate::solve::{solve, SolveCfg, SolveReport, SolverKind};
pub use crate::vertex_cover::{is_vertex_cover, minimum_vertex_cover, vertex_cover};
