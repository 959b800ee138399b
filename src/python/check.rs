//! Python distribution checker
//!
//! An artifact passes when `twine check` accepts its metadata and it can be
//! installed into a fresh virtual environment where the test command
//! succeeds. The environment lives in a temporary directory that is removed
//! on every exit path.

use crate::core::context::ReleaseContext;
use crate::core::error::{DistError, ReleaseError, ReleaseResult, ResultExt};
use crate::core::process::{CommandSpec, split_command_line};
use crate::python::artifact::Artifact;
use crate::ui::progress::ArtifactProgress;
use crate::utils::{normalize_path, venv_bin_dir};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{Level, debug, info};

/// Default smoke test: import the package by its import name
pub fn default_test_command(dist_file: &Path) -> ReleaseResult<String> {
  let artifact = Artifact::from_path(dist_file)?;
  Ok(format!("python -c \"import {}\"", artifact.import_name()))
}

/// Check a single built artifact
///
/// An empty `test_cmd` falls back to [`default_test_command`].
pub fn check_dist(ctx: &ReleaseContext, dist_file: &Path, test_cmd: &str) -> ReleaseResult<()> {
  let dist_file = normalize_path(dist_file, &ctx.root);
  let quiet = !ctx.verbose;
  let fail = |err: ReleaseError| into_check_failure(err, &dist_file);

  let twine = CommandSpec::new(&ctx.config.tools.twine)
    .arg("check")
    .path_arg(&dist_file)
    .quiet(quiet);
  ctx.runner.run(&twine).map_err(fail)?;

  let test_cmd = if test_cmd.trim().is_empty() {
    default_test_command(&dist_file)?
  } else {
    test_cmd.to_string()
  };
  let test_words = split_command_line(&test_cmd)?;

  let env_dir = TempDir::new().context("Failed to create temporary environment directory")?;
  let env_path = normalize_path(env_dir.path(), &ctx.root);
  let bin = venv_bin_dir(&env_path);
  debug!("Checking {} in {}", dist_file.display(), env_path.display());

  let steps = [
    CommandSpec::new(&ctx.config.tools.python)
      .args(["-m", "venv"])
      .path_arg(&env_path),
    CommandSpec::from_path(&bin.join("python")).args(["-m", "pip", "install", "-q", "-U", "pip"]),
    CommandSpec::from_path(&bin.join("pip"))
      .args(["install", "-q"])
      .path_arg(&dist_file),
    CommandSpec::from_path(&bin.join(&test_words[0])).args(test_words[1..].iter().cloned()),
  ];

  for spec in steps {
    let spec = spec.current_dir(&ctx.root).quiet(quiet);
    ctx.runner.run(&spec).map_err(fail)?;
  }

  // Explicit close surfaces removal errors; on early return Drop cleans up
  env_dir
    .close()
    .with_context(|| format!("Failed to remove {}", env_path.display()))?;
  Ok(())
}

/// Outcome of checking one artifact as part of a batch
#[derive(Debug)]
pub struct CheckOutcome {
  pub artifact: PathBuf,
  pub result: ReleaseResult<()>,
}

impl CheckOutcome {
  pub fn passed(&self) -> bool {
    self.result.is_ok()
  }
}

/// Check several artifacts; one failure does not stop the others
///
/// With `parallel`, artifacts are checked concurrently. Each check owns its
/// own temporary environment, so they never share state.
pub fn check_all(ctx: &ReleaseContext, artifacts: &[Artifact], test_cmd: &str, parallel: bool) -> Vec<CheckOutcome> {
  let check_one = |artifact: &Artifact| CheckOutcome {
    artifact: artifact.path.clone(),
    result: check_dist(ctx, &artifact.path, test_cmd),
  };

  if parallel {
    info!("Checking {} artifact(s) in parallel", artifacts.len());
    artifacts.par_iter().map(check_one).collect()
  } else {
    let show_bar = progress_bar_wanted(ctx.verbose, artifacts.len(), tracing::enabled!(Level::INFO));
    let mut progress = show_bar.then(|| ArtifactProgress::new(artifacts.len(), "Checking"));
    artifacts
      .iter()
      .map(|artifact| {
        let outcome = check_one(artifact);
        if let Some(progress) = progress.as_mut() {
          progress.inc();
        }
        outcome
      })
      .collect()
  }
}

/// The bar shares stderr with command log lines, so it is only drawn when
/// nothing else writes there between increments
fn progress_bar_wanted(verbose: bool, count: usize, info_logged: bool) -> bool {
  !verbose && !info_logged && count > 1
}

fn into_check_failure(err: ReleaseError, artifact: &Path) -> ReleaseError {
  match err {
    ReleaseError::Process(process) => DistError::CheckFailed {
      artifact: artifact.to_path_buf(),
      command: process.command().to_string(),
      output: process.output().to_string(),
    }
    .into(),
    other => other,
  }
}
