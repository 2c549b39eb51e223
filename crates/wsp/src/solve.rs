//! Unified entry point: validate an instance, run one solver, report.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backtracking::WspBacktracking;
use crate::error::InstanceError;
use crate::instance::WspInstance;
use crate::pbt::WspOrchestrator;
use crate::Encoding;

/// Which exact strategy to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// Exhaustive assignment search; reports every solution.
    #[default]
    Backtracking,
    /// Partition enumeration + block matching; one solution per matched partition.
    Pbt,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolverKind::Backtracking => "backtracking",
            SolverKind::Pbt => "pbt",
        })
    }
}

/// Solve configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveCfg {
    pub solver: SolverKind,
    /// Stop after this many solutions (`None` = all).
    pub max_solutions: Option<usize>,
}

/// Outcome of one solve call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    pub solver: SolverKind,
    pub satisfiable: bool,
    pub solutions: Vec<Encoding>,
    /// Partitions generated (PBT only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub partitions_examined: Option<usize>,
    pub elapsed_ms: f64,
}

pub fn solve(instance: &WspInstance, cfg: SolveCfg) -> Result<SolveReport, InstanceError> {
    let (graph, auth) = instance.build()?;
    let limit = cfg.max_solutions.unwrap_or(usize::MAX);
    let start = Instant::now();
    // The verdict never depends on the cap: `max_solutions = 0` still decides.
    let (satisfiable, solutions, partitions_examined) = match cfg.solver {
        SolverKind::Backtracking => {
            let bt = WspBacktracking::new(&graph, &auth)?;
            let sols: Vec<_> = bt.solutions().take(limit).collect();
            let satisfiable = !sols.is_empty() || (limit == 0 && bt.first().is_some());
            (satisfiable, sols, None)
        }
        SolverKind::Pbt => {
            let report = WspOrchestrator::new(&graph, &auth)?.solve();
            let sols: Vec<_> = report.encodings().take(limit).cloned().collect();
            (report.satisfiable, sols, Some(report.outcomes.len()))
        }
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
    info!(
        solver = %cfg.solver,
        steps = instance.num_steps,
        users = instance.num_users,
        satisfiable,
        solutions = solutions.len(),
        elapsed_ms,
        "solved"
    );
    Ok(SolveReport {
        solver: cfg.solver,
        satisfiable,
        solutions,
        partitions_examined,
        elapsed_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Constraint;

    fn diag() -> WspInstance {
        WspInstance {
            num_steps: 3,
            num_users: 3,
            authorization: vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]],
            constraints: vec![Constraint::different(0, 1)],
        }
    }

    #[test]
    fn both_solvers_agree_on_diagonal() {
        for solver in [SolverKind::Backtracking, SolverKind::Pbt] {
            let r = solve(&diag(), SolveCfg { solver, max_solutions: None }).unwrap();
            assert!(r.satisfiable);
            assert_eq!(r.solutions, vec![vec![0, 1, 2]]);
            assert_eq!(r.partitions_examined.is_some(), solver == SolverKind::Pbt);
        }
    }

    #[test]
    fn max_solutions_caps_output() {
        let inst = WspInstance {
            num_steps: 2,
            num_users: 3,
            authorization: vec![vec![1, 1, 1], vec![1, 1, 1]],
            constraints: vec![],
        };
        let cfg = SolveCfg {
            solver: SolverKind::Backtracking,
            max_solutions: Some(4),
        };
        let r = solve(&inst, cfg).unwrap();
        assert_eq!(r.solutions.len(), 4);
        assert_eq!(r.solutions[0], vec![0, 0]);
    }

    #[test]
    fn zero_cap_still_reports_the_verdict() {
        let sat = WspInstance {
            num_steps: 1,
            num_users: 1,
            authorization: vec![vec![1]],
            constraints: vec![],
        };
        let unsat = WspInstance {
            num_steps: 2,
            num_users: 1,
            authorization: vec![vec![1], vec![1]],
            constraints: vec![Constraint::different(0, 1)],
        };
        for solver in [SolverKind::Backtracking, SolverKind::Pbt] {
            let cfg = SolveCfg {
                solver,
                max_solutions: Some(0),
            };
            let r = solve(&sat, cfg).unwrap();
            assert!(r.satisfiable, "{solver}");
            assert!(r.solutions.is_empty());
            assert!(!solve(&unsat, cfg).unwrap().satisfiable, "{solver}");
        }
    }

    #[test]
    fn invalid_instance_is_an_error_not_unsat() {
        let mut inst = diag();
        inst.num_users = 4;
        assert!(solve(&inst, SolveCfg::default()).is_err());
    }

    #[test]
    fn report_serializes_solver_name() {
        let r = solve(&diag(), SolveCfg::default()).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["solver"], "backtracking");
        assert!(json.get("partitions_examined").is_none());
    }
}
