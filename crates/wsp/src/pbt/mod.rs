//! Partition-based decomposition (PBT) for WSP.
//!
//! Purpose
//! - Enumerate every set-partition of the steps that keeps SAME pairs together
//!   and DIFFERENT pairs apart (`partition`).
//! - For each partition, look for an injective block → user assignment where every
//!   user is authorized for all steps of its block (`matching`).
//! - Expand successful matchings to step-level encodings (`orchestrator`).
//!
//! Why distinct users per block is enough
//! - Two blocks that could legally share a user also appear merged as a single
//!   block in some other enumerated partition, so requiring distinct users inside
//!   one partition never loses a satisfiable instance. The PBT verdict therefore
//!   always agrees with exhaustive backtracking.

mod matching;
mod orchestrator;
mod partition;

pub use matching::{authorize_partition, BlockUserMatching};
pub use orchestrator::{OrchestratorReport, PartitionOutcome, WspOrchestrator};
pub use partition::{Partition, PartitionGenerator, Partitions};
