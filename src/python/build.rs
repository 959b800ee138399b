//! Python distribution builder
//!
//! Cleans stale artifacts out of the dist directory, then builds an sdist and
//! a wheel with whichever strategy the project's descriptor selects.

use crate::core::context::ReleaseContext;
use crate::core::error::{DistError, ReleaseError, ReleaseResult, ResultExt};
use crate::core::process::CommandSpec;
use crate::python::artifact::{Artifact, artifact_paths, list_artifacts};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const PYPROJECT: &str = "pyproject.toml";
pub const SETUP_PY: &str = "setup.py";

/// How the project is packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStrategy {
  /// `python -m build` (PEP 517 frontend, sdist + wheel in one step)
  Frontend,
  /// `python setup.py sdist` then `python setup.py bdist_wheel`
  LegacySetup,
}

impl BuildStrategy {
  /// Pick the strategy from the descriptor present in `root`
  ///
  /// pyproject.toml takes precedence; `None` when neither file exists.
  pub fn detect(root: &Path) -> Option<Self> {
    if root.join(PYPROJECT).exists() {
      Some(BuildStrategy::Frontend)
    } else if root.join(SETUP_PY).exists() {
      Some(BuildStrategy::LegacySetup)
    } else {
      None
    }
  }

  /// Commands to run, in order
  pub fn commands(self, python: &str, dist_dir: &Path) -> Vec<CommandSpec> {
    match self {
      BuildStrategy::Frontend => vec![
        CommandSpec::new(python)
          .args(["-m", "build", "--outdir"])
          .path_arg(dist_dir)
          .arg("."),
      ],
      BuildStrategy::LegacySetup => vec![
        CommandSpec::new(python)
          .args([SETUP_PY, "sdist", "--dist-dir"])
          .path_arg(dist_dir),
        CommandSpec::new(python)
          .args([SETUP_PY, "bdist_wheel", "--dist-dir"])
          .path_arg(dist_dir),
      ],
    }
  }
}

/// Build the python dist files into `dist_dir`
///
/// Returns the artifacts present in `dist_dir` afterwards. Without a
/// descriptor nothing is built, unless `require_descriptor` makes that an
/// error.
pub fn build_dist(ctx: &ReleaseContext, dist_dir: &Path) -> ReleaseResult<Vec<Artifact>> {
  let dist_dir = ctx.resolve(dist_dir);
  fs::create_dir_all(&dist_dir).with_context(|| format!("Failed to create {}", dist_dir.display()))?;

  let removed = clean_dist_dir(&dist_dir)?;
  if removed > 0 {
    info!("Removed {} stale artifact(s) from {}", removed, dist_dir.display());
  }

  let Some(strategy) = BuildStrategy::detect(&ctx.root) else {
    if ctx.config.python.require_descriptor {
      return Err(DistError::NoDescriptor { dir: ctx.root.clone() }.into());
    }
    warn!(
      "No {} or {} in {}; skipping python build",
      PYPROJECT,
      SETUP_PY,
      ctx.root.display()
    );
    return Ok(Vec::new());
  };

  for spec in strategy.commands(&ctx.config.tools.python, &dist_dir) {
    let spec = spec.current_dir(&ctx.root).quiet(true);
    ctx.runner.run(&spec).map_err(into_build_failure)?;
  }

  list_artifacts(&dist_dir)
}

/// Delete existing sdists and wheels; returns how many were removed
pub fn clean_dist_dir(dist_dir: &Path) -> ReleaseResult<usize> {
  let paths = artifact_paths(dist_dir)?;
  for path in &paths {
    fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
  }
  Ok(paths.len())
}

fn into_build_failure(err: ReleaseError) -> ReleaseError {
  match err {
    ReleaseError::Process(process) => DistError::BuildFailed {
      command: process.command().to_string(),
      output: process.output().to_string(),
    }
    .into(),
    other => other,
  }
}
