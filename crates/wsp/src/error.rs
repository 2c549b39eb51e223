//! Input-contract violations.
//!
//! UNSAT outcomes are ordinary results and never show up here.

use thiserror::Error;

/// Error raised when an instance (or generator parameters) breaks the input contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("instance needs at least one step and one user (steps={num_steps}, users={num_users})")]
    EmptyInstance { num_steps: usize, num_users: usize },

    #[error("{what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("authorization row {step} has {found} entries, expected {expected}")]
    RaggedRow {
        step: usize,
        expected: usize,
        found: usize,
    },

    #[error("authorization entry ({step}, {user}) is {value}, expected 0 or 1")]
    NonBinaryEntry { step: usize, user: usize, value: u8 },

    #[error("constraint references step {step}, but the instance has {num_steps} steps")]
    StepOutOfRange { step: usize, num_steps: usize },

    #[error("constraint relates step {step} to itself")]
    SelfConstraint { step: usize },

    #[error("edge references vertex {vertex}, but the graph has {vertices} vertices")]
    VertexOutOfRange { vertex: usize, vertices: usize },

    #[error("edge ({vertex}, {vertex}) is a self-loop")]
    SelfLoop { vertex: usize },

    #[error("invalid generator params: {reason}")]
    InvalidParams { reason: String },
}

impl InstanceError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}
