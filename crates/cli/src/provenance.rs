//! Provenance sidecars for solver reports and bench tables.
//!
//! Every artifact written with `--out` gets `<stem>.provenance.json` next to it.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// What produced an artifact: the subcommand and its resolved parameters.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self { command, params }
    }
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: &'a str,
    wsp_version: &'a str,
    command: &'a str,
    callsite: String,
    params: &'a Value,
    outputs: Vec<String>,
}

/// Write the sidecar for `artifact` and return its path.
#[track_caller]
pub fn write_sidecar(artifact: &Path, payload: Payload) -> Result<PathBuf> {
    let callsite = Location::caller();
    let doc = Sidecar {
        code_rev: current_git_rev(),
        wsp_version: wsp::VERSION,
        command: payload.command,
        callsite: format!("{}:{}", callsite.file(), callsite.line()),
        params: &payload.params,
        outputs: vec![artifact.to_string_lossy().into_owned()],
    };
    let path = sidecar_path(artifact);
    std::fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map_or_else(|| String::from("artifact"), |s| s.to_string_lossy().into_owned());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then runtime), else `git rev-parse HEAD`, else "unknown".
/// Resolved once per process.
pub fn current_git_rev() -> &'static str {
    static REV: OnceLock<String> = OnceLock::new();
    REV.get_or_init(|| {
        option_env!("GIT_COMMIT")
            .map(str::to_owned)
            .or_else(|| std::env::var("GIT_COMMIT").ok())
            .filter(|r| !r.is_empty())
            .or_else(git_head)
            .unwrap_or_else(|| "unknown".to_owned())
    })
}

fn git_head() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8(output.stdout).ok()?;
    Some(rev.trim().to_owned())
}
