//! Benchmark grid over random instances: both solvers, one row per run.
//!
//! Rows go through a polars `DataFrame` so the same table can be written as CSV
//! or Parquet and summarized lazily afterwards.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::*;
use wsp::api::{
    InstanceGenerator, RandomInstanceParams, SolverKind, WspBacktracking, WspOrchestrator,
};

/// Grid of instance shapes; every density is used for both constraints and authorization.
#[derive(Clone, Debug)]
pub struct BenchGrid {
    pub seed: u64,
    pub steps: Vec<usize>,
    pub users: Vec<usize>,
    pub densities: Vec<f64>,
    /// Backtracking stops after this many solutions.
    pub max_solutions: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BenchRow {
    pub solver: SolverKind,
    pub num_steps: usize,
    pub num_users: usize,
    pub p_constraint: f64,
    pub p_auth: f64,
    pub time_ms: f64,
    pub found: bool,
}

pub fn run_grid(grid: &BenchGrid) -> Result<Vec<BenchRow>> {
    let mut rows = Vec::new();
    let mut sample: u64 = 0;
    for &num_steps in &grid.steps {
        for &num_users in &grid.users {
            for &p_constraint in &grid.densities {
                for &p_auth in &grid.densities {
                    let params = RandomInstanceParams {
                        num_steps,
                        num_users,
                        constraint_density: p_constraint,
                        auth_density: p_auth,
                    };
                    let seed = grid.seed.wrapping_add(sample);
                    sample += 1;
                    let inst = InstanceGenerator::generate_single(&params, seed)?;
                    let (graph, auth) = inst.build()?;

                    let t0 = Instant::now();
                    let found = WspBacktracking::new(&graph, &auth)?
                        .solutions()
                        .take(grid.max_solutions)
                        .count()
                        > 0;
                    let bt_ms = t0.elapsed().as_secs_f64() * 1e3;

                    let t1 = Instant::now();
                    let pbt_found = WspOrchestrator::new(&graph, &auth)?.solve().satisfiable;
                    let pbt_ms = t1.elapsed().as_secs_f64() * 1e3;

                    if found != pbt_found {
                        tracing::warn!(seed, num_steps, num_users, "solvers disagree");
                    }
                    tracing::debug!(seed, num_steps, num_users, p_constraint, p_auth, bt_ms, pbt_ms, "bench sample");
                    for (solver, time_ms, found) in [
                        (SolverKind::Backtracking, bt_ms, found),
                        (SolverKind::Pbt, pbt_ms, pbt_found),
                    ] {
                        rows.push(BenchRow {
                            solver,
                            num_steps,
                            num_users,
                            p_constraint,
                            p_auth,
                            time_ms,
                            found,
                        });
                    }
                }
            }
        }
    }
    Ok(rows)
}

pub fn rows_to_frame(rows: &[BenchRow]) -> Result<DataFrame> {
    let solver: Vec<String> = rows.iter().map(|r| r.solver.to_string()).collect();
    let num_steps = rows
        .iter()
        .map(|r| u64::try_from(r.num_steps))
        .collect::<Result<Vec<u64>, _>>()
        .context("num_steps column")?;
    let num_users = rows
        .iter()
        .map(|r| u64::try_from(r.num_users))
        .collect::<Result<Vec<u64>, _>>()
        .context("num_users column")?;
    let p_constraint: Vec<f64> = rows.iter().map(|r| r.p_constraint).collect();
    let p_auth: Vec<f64> = rows.iter().map(|r| r.p_auth).collect();
    let time_ms: Vec<f64> = rows.iter().map(|r| r.time_ms).collect();
    let found: Vec<bool> = rows.iter().map(|r| r.found).collect();
    let df = df!(
        "solver" => solver,
        "num_steps" => num_steps,
        "num_users" => num_users,
        "p_constraint" => p_constraint,
        "p_auth" => p_auth,
        "time_ms" => time_ms,
        "found" => found,
    )?;
    Ok(df)
}

/// Write as Parquet when the extension is `.parquet`, CSV otherwise.
pub fn write_frame(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    if out.extension().is_some_and(|e| e == "parquet") {
        ParquetWriter::new(file).finish(df)?;
    } else {
        let mut file = file;
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
    }
    Ok(())
}

/// Mean time, run count and satisfiable count per solver from a results CSV.
pub fn summarize(input: &Path) -> Result<DataFrame> {
    let df = LazyCsvReader::new(input)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("reading {}", input.display()))?
        .group_by([col("solver")])
        .agg([
            col("time_ms").mean().alias("mean_time_ms"),
            col("time_ms").count().alias("runs"),
            col("found").cast(DataType::UInt32).sum().alias("found"),
        ])
        .sort(["solver"], SortMultipleOptions::default())
        .collect()?;
    Ok(df)
}
