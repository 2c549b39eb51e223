use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;
use wsp::api::{
    minimum_vertex_cover, vertex_cover, SolveCfg, SolveReport, SolverKind, VcInstance, WspInstance,
};

mod bench;
mod provenance;

use bench::BenchGrid;
use provenance::Payload;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Workflow satisfiability and vertex cover solvers")]
struct Cmd {
    /// Log solver internals at DEBUG level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SolverArg {
    Backtracking,
    Pbt,
}

impl From<SolverArg> for SolverKind {
    fn from(s: SolverArg) -> Self {
        match s {
            SolverArg::Backtracking => SolverKind::Backtracking,
            SolverArg::Pbt => SolverKind::Pbt,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Solve a WSP instance read from JSON
    Solve {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = SolverArg::Backtracking)]
        solver: SolverArg,
        /// Stop after this many solutions
        #[arg(long)]
        max_solutions: Option<usize>,
        /// Abandon the solve after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Vertex cover of a graph read from JSON (minimum when no budget is given)
    Cover {
        #[arg(long)]
        input: PathBuf,
        /// Budget; overrides `k` from the input file
        #[arg(long)]
        k: Option<usize>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Time both WSP solvers over a grid of random instances
    Bench {
        /// `.parquet` writes Parquet, anything else CSV
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 3)]
        min_steps: usize,
        #[arg(long, default_value_t = 7)]
        max_steps: usize,
        #[arg(long, default_value_t = 2)]
        step_stride: usize,
        #[arg(long, value_delimiter = ',', default_value = "3,5")]
        users: Vec<usize>,
        #[arg(long, value_delimiter = ',', default_value = "0.2,0.5,0.8")]
        densities: Vec<f64>,
        #[arg(long, default_value_t = 1000)]
        max_solutions: usize,
    },
    /// Aggregate a bench CSV per solver
    Summary {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Solve {
            input,
            solver,
            max_solutions,
            timeout_secs,
            out,
        } => {
            let cfg = SolveCfg {
                solver: solver.into(),
                max_solutions,
            };
            solve(&input, cfg, timeout_secs.map(Duration::from_secs), out.as_deref())
        }
        Action::Cover { input, k, out } => cover(&input, k, out.as_deref()),
        Action::Bench {
            out,
            seed,
            min_steps,
            max_steps,
            step_stride,
            users,
            densities,
            max_solutions,
        } => {
            if step_stride == 0 {
                bail!("--step-stride must be positive");
            }
            let grid = BenchGrid {
                seed,
                steps: (min_steps..=max_steps).step_by(step_stride).collect(),
                users,
                densities,
                max_solutions,
            };
            bench(&grid, &out)
        }
        Action::Summary { input } => {
            let df = bench::summarize(&input)?;
            println!("{df}");
            Ok(())
        }
        Action::Report => report(),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Pretty JSON to `out` (+ provenance sidecar) or to stdout.
fn emit<T: Serialize>(value: &T, out: Option<&Path>, payload: Payload) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating output dir {}", parent.display()))?;
                }
            }
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            let prov = provenance::write_sidecar(path, payload)?;
            tracing::info!(out = %path.display(), provenance = %prov.display(), "wrote");
        }
        None => println!("{}", String::from_utf8_lossy(&json)),
    }
    Ok(())
}

/// Run the solve on a worker thread; past the deadline the worker is abandoned.
fn solve_with_deadline(
    instance: WspInstance,
    cfg: SolveCfg,
    timeout: Option<Duration>,
) -> Result<SolveReport> {
    let Some(timeout) = timeout else {
        return Ok(wsp::solve(&instance, cfg)?);
    };
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(wsp::solve(&instance, cfg));
    });
    match rx.recv_timeout(timeout) {
        Ok(report) => Ok(report?),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            bail!("solve did not finish within {}s", timeout.as_secs())
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => bail!("solver worker exited without a result"),
    }
}

fn solve(input: &Path, cfg: SolveCfg, timeout: Option<Duration>, out: Option<&Path>) -> Result<()> {
    let instance: WspInstance = read_json(input)?;
    tracing::info!(
        input = %input.display(),
        solver = %cfg.solver,
        steps = instance.num_steps,
        users = instance.num_users,
        "solve"
    );
    let report = solve_with_deadline(instance, cfg, timeout)
        .with_context(|| format!("solving {}", input.display()))?;
    let payload = Payload::new(
        "solve",
        serde_json::json!({
            "input": input.to_string_lossy(),
            "solver": cfg.solver,
            "max_solutions": cfg.max_solutions,
            "timeout_secs": timeout.map(|t| t.as_secs()),
        }),
    );
    emit(&report, out, payload)
}

#[derive(Debug, Serialize)]
struct CoverReport {
    k: Option<usize>,
    satisfiable: bool,
    cover: Option<Vec<usize>>,
}

fn cover(input: &Path, k: Option<usize>, out: Option<&Path>) -> Result<()> {
    let instance: VcInstance = read_json(input)?;
    let mut graph = instance
        .graph()
        .with_context(|| format!("building graph from {}", input.display()))?;
    let k = k.or(instance.k);
    let cover = match k {
        Some(k) => vertex_cover(&mut graph, k),
        None => Some(minimum_vertex_cover(&mut graph)),
    };
    tracing::info!(vertices = instance.vertices, edges = instance.edges.len(), ?k, found = cover.is_some(), "cover");
    let report = CoverReport {
        k,
        satisfiable: cover.is_some(),
        cover,
    };
    let payload = Payload::new(
        "cover",
        serde_json::json!({ "input": input.to_string_lossy(), "k": k }),
    );
    emit(&report, out, payload)
}

fn bench(grid: &BenchGrid, out: &Path) -> Result<()> {
    tracing::info!(?grid, out = %out.display(), "bench");
    let rows = bench::run_grid(grid)?;
    let mut df = bench::rows_to_frame(&rows)?;
    tracing::info!(rows = df.height(), cols = df.width(), "bench_frame");
    bench::write_frame(&mut df, out)?;
    let payload = Payload::new(
        "bench",
        serde_json::json!({
            "seed": grid.seed,
            "steps": grid.steps,
            "users": grid.users,
            "densities": grid.densities,
            "max_solutions": grid.max_solutions,
        }),
    );
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "wsp_version": wsp::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wsp::api::Constraint;

    fn diag() -> WspInstance {
        WspInstance {
            num_steps: 3,
            num_users: 3,
            authorization: vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]],
            constraints: vec![Constraint::different(0, 1)],
        }
    }

    #[test]
    fn deadline_path_returns_report() {
        let cfg = SolveCfg {
            solver: SolverKind::Pbt,
            max_solutions: None,
        };
        let report = solve_with_deadline(diag(), cfg, Some(Duration::from_secs(30))).unwrap();
        assert!(report.satisfiable);
        assert_eq!(report.solutions, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn invalid_instance_surfaces_as_error() {
        let mut inst = diag();
        inst.authorization.pop();
        assert!(solve_with_deadline(inst, SolveCfg::default(), None).is_err());
    }

    #[test]
    fn solve_writes_report_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("inst.json");
        std::fs::write(&input, serde_json::to_vec(&diag()).unwrap()).unwrap();
        let out = dir.path().join("out").join("report.json");
        solve(&input, SolveCfg::default(), None, Some(&out)).unwrap();
        let report: SolveReport = read_json(&out).unwrap();
        assert_eq!(report.solutions, vec![vec![0, 1, 2]]);
        assert!(dir.path().join("out").join("report.provenance.json").exists());
    }

    #[test]
    fn cover_uses_budget_from_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("star.json");
        std::fs::write(
            &input,
            r#"{"vertices": 5, "edges": [[0, 1], [0, 2], [0, 3], [0, 4]], "k": 1}"#,
        )
        .unwrap();
        let out = dir.path().join("cover.json");
        cover(&input, None, Some(&out)).unwrap();
        let parsed: serde_json::Value = read_json(&out).unwrap();
        assert_eq!(parsed["cover"], serde_json::json!([0]));
        assert_eq!(parsed["satisfiable"], true);
    }

    #[test]
    fn bench_csv_roundtrips_through_summary() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("bench.csv");
        let grid = BenchGrid {
            seed: 1,
            steps: vec![3],
            users: vec![2],
            densities: vec![0.5],
            max_solutions: 10,
        };
        bench(&grid, &out).unwrap();
        assert!(dir.path().join("bench.provenance.json").exists());
        let summary = bench::summarize(&out).unwrap();
        assert_eq!(summary.height(), 2);
    }
}
