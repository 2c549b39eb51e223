//! Drives partition generation and block matching into step-level assignments.

use tracing::{debug, trace};

use crate::authorization::AuthorizationMatrix;
use crate::error::InstanceError;
use crate::graph::ConstraintGraph;
use crate::Encoding;

use super::matching::{authorize_partition, BlockUserMatching};
use super::partition::{Partition, PartitionGenerator};

/// Result for one generated partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionOutcome {
    pub partition: Partition,
    /// Matching and its step-level expansion; `None` when no perfect matching exists.
    pub assignment: Option<(BlockUserMatching, Encoding)>,
}

impl PartitionOutcome {
    pub fn encoding(&self) -> Option<&Encoding> {
        self.assignment.as_ref().map(|(_, e)| e)
    }
}

/// One entry per generated partition plus the aggregate verdict.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrchestratorReport {
    pub outcomes: Vec<PartitionOutcome>,
    pub satisfiable: bool,
}

impl OrchestratorReport {
    /// Step-level encodings of every matched partition, in generation order.
    pub fn encodings(&self) -> impl Iterator<Item = &Encoding> + '_ {
        self.outcomes.iter().filter_map(PartitionOutcome::encoding)
    }

    pub fn matched_count(&self) -> usize {
        self.encodings().count()
    }
}

/// PBT solver: partitions first, one matching per partition.
#[derive(Clone, Copy, Debug)]
pub struct WspOrchestrator<'a> {
    graph: &'a ConstraintGraph,
    auth: &'a AuthorizationMatrix,
}

impl<'a> WspOrchestrator<'a> {
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

    pub fn solve(&self) -> OrchestratorReport {
        let num_steps = self.graph.num_steps();
        let empty = self.auth.empty_steps();
        if !empty.is_empty() {
            debug!(steps = ?empty, "authorization-empty steps, instance is UNSAT");
            return OrchestratorReport::default();
        }
        let mut report = OrchestratorReport::default();
        for partition in PartitionGenerator::new(self.graph).partitions() {
            let assignment = authorize_partition(&partition, self.auth).map(|m| {
                let encoding = m.expand(&partition, num_steps);
                (m, encoding)
            });
            match &assignment {
                Some((m, encoding)) => {
                    trace!(%partition, matching = ?m.as_slice(), ?encoding, "partition authorized");
                    report.satisfiable = true;
                }
                None => trace!(%partition, "partition not authorized"),
            }
            report.outcomes.push(PartitionOutcome {
                partition,
                assignment,
            });
        }
        debug!(
            partitions = report.outcomes.len(),
            matched = report.matched_count(),
            satisfiable = report.satisfiable,
            "pbt finished"
        );
        report
    }

    /// Stop at the first authorized partition.
    pub fn first(&self) -> Option<Encoding> {
        if !self.auth.empty_steps().is_empty() {
            return None;
        }
        PartitionGenerator::new(self.graph)
            .partitions()
            .find_map(|p| authorize_partition(&p, self.auth).map(|m| m.expand(&p, self.graph.num_steps())))
    }
}
