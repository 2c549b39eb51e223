//! Serializable problem instances and their validation.
//!
//! These are the structures the CLI reads from JSON. `validate` enforces the
//! input contract; builders turn a valid instance into solver structures.

use serde::{Deserialize, Serialize};

use crate::authorization::AuthorizationMatrix;
use crate::error::InstanceError;
use crate::graph::{ConstraintGraph, ConstraintKind, Graph};

/// One `(a, b, kind)` constraint triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub a: usize,
    pub b: usize,
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn same(a: usize, b: usize) -> Self {
        Self {
            a,
            b,
            kind: ConstraintKind::Same,
        }
    }

    pub fn different(a: usize, b: usize) -> Self {
        Self {
            a,
            b,
            kind: ConstraintKind::Different,
        }
    }
}

/// WSP instance: step/user counts, row-major authorization, constraints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WspInstance {
    pub num_steps: usize,
    pub num_users: usize,
    /// One row per step, one {0,1} entry per user.
    pub authorization: Vec<Vec<u8>>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl WspInstance {
    pub fn validate(&self) -> Result<(), InstanceError> {
        if self.num_steps == 0 || self.num_users == 0 {
            return Err(InstanceError::EmptyInstance {
                num_steps: self.num_steps,
                num_users: self.num_users,
            });
        }
        if self.authorization.len() != self.num_steps {
            return Err(InstanceError::DimensionMismatch {
                what: "authorization rows",
                expected: self.num_steps,
                found: self.authorization.len(),
            });
        }
        for (step, row) in self.authorization.iter().enumerate() {
            if row.len() != self.num_users {
                return Err(InstanceError::RaggedRow {
                    step,
                    expected: self.num_users,
                    found: row.len(),
                });
            }
        }
        for c in &self.constraints {
            for step in [c.a, c.b] {
                if step >= self.num_steps {
                    return Err(InstanceError::StepOutOfRange {
                        step,
                        num_steps: self.num_steps,
                    });
                }
            }
            if c.a == c.b {
                return Err(InstanceError::SelfConstraint { step: c.a });
            }
        }
        Ok(())
    }

    /// Constraint graph; a repeated pair keeps the last kind listed.
    pub fn constraint_graph(&self) -> Result<ConstraintGraph, InstanceError> {
        self.validate()?;
        let mut g = ConstraintGraph::new(self.num_steps);
        for c in &self.constraints {
            g.add_constraint_edge(c.a, c.b, c.kind);
        }
        Ok(g)
    }

    pub fn authorization_matrix(&self) -> Result<AuthorizationMatrix, InstanceError> {
        self.validate()?;
        AuthorizationMatrix::from_rows(&self.authorization)
    }

    /// Both solver inputs at once.
    pub fn build(&self) -> Result<(ConstraintGraph, AuthorizationMatrix), InstanceError> {
        Ok((self.constraint_graph()?, self.authorization_matrix()?))
    }
}

/// Vertex Cover instance: vertex count, edge list, budget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcInstance {
    pub vertices: usize,
    pub edges: Vec<(usize, usize)>,
    /// Budget; `None` asks for a minimum cover.
    #[serde(default)]
    pub k: Option<usize>,
}

impl VcInstance {
    pub fn validate(&self) -> Result<(), InstanceError> {
        for &(u, v) in &self.edges {
            for vertex in [u, v] {
                if vertex >= self.vertices {
                    return Err(InstanceError::VertexOutOfRange {
                        vertex,
                        vertices: self.vertices,
                    });
                }
            }
            // Edge selection only scans `u < v` pairs and never branches on a loop.
            if u == v {
                return Err(InstanceError::SelfLoop { vertex: u });
            }
        }
        Ok(())
    }

    pub fn graph(&self) -> Result<Graph, InstanceError> {
        self.validate()?;
        let mut g = Graph::new(self.vertices);
        for &(u, v) in &self.edges {
            g.add_edge(u, v);
        }
        Ok(g)
    }
}
