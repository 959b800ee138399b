//! `build-python` command

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::python::{Artifact, build_dist};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct ArtifactReport<'a> {
  #[serde(flatten)]
  artifact: &'a Artifact,
  sha256: String,
}

/// Build sdist and wheel into the dist directory
pub fn run_build_python(ctx: &ReleaseContext, dist_dir: Option<PathBuf>, json: bool) -> ReleaseResult<()> {
  let dist_dir = dist_dir.map(|d| ctx.resolve(&d)).unwrap_or_else(|| ctx.dist_dir());

  if !json {
    println!("📦 Building python distribution into {}", dist_dir.display());
  }

  let artifacts = build_dist(ctx, &dist_dir)?;
  let reports = artifacts
    .iter()
    .map(|artifact| {
      Ok(ArtifactReport {
        artifact,
        sha256: artifact.sha256()?,
      })
    })
    .collect::<ReleaseResult<Vec<_>>>()?;

  if json {
    println!("{}", serde_json::to_string_pretty(&reports)?);
    return Ok(());
  }

  if reports.is_empty() {
    println!("⚠️  Nothing was built (no pyproject.toml or setup.py)");
    return Ok(());
  }

  for report in &reports {
    println!(
      "   {} ({}, {})  sha256:{}",
      report.artifact.file_name(),
      report.artifact.kind,
      report.artifact.version,
      &report.sha256[..12]
    );
  }
  println!();
  println!("✅ Built {} artifact(s)", reports.len());
  Ok(())
}
