//! `check-python` command

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult, print_error};
use crate::python::{Artifact, check_all, list_artifacts};
use std::path::PathBuf;

/// Check the given artifacts, or everything in the dist directory
pub fn run_check_python(
  ctx: &ReleaseContext,
  files: Vec<PathBuf>,
  dist_dir: Option<PathBuf>,
  test_cmd: Option<String>,
  parallel: bool,
) -> ReleaseResult<()> {
  let artifacts = if files.is_empty() {
    let dist_dir = dist_dir.map(|d| ctx.resolve(&d)).unwrap_or_else(|| ctx.dist_dir());
    let found = list_artifacts(&dist_dir)?;
    if found.is_empty() {
      return Err(ReleaseError::with_help(
        format!("No artifacts found in {}", dist_dir.display()),
        "Run `release-rail build-python` first, or pass artifact paths explicitly.",
      ));
    }
    found
  } else {
    files
      .iter()
      .map(|f| Artifact::from_path(&ctx.resolve(f)))
      .collect::<ReleaseResult<Vec<_>>>()?
  };

  let test_cmd = test_cmd
    .or_else(|| ctx.config.python.test_cmd.clone())
    .unwrap_or_default();

  println!("🔍 Checking {} artifact(s)", artifacts.len());
  let outcomes = check_all(ctx, &artifacts, &test_cmd, parallel);

  println!();
  let failed = outcomes.iter().filter(|o| !o.passed()).count();
  let mut first_failure = None;
  for outcome in outcomes {
    let name = outcome.artifact.display();
    match outcome.result {
      Ok(()) => println!("   ✅ {}", name),
      Err(err) => {
        println!("   ❌ {}", name);
        // The first failure is returned and printed by main; report the rest here
        if first_failure.is_none() {
          first_failure = Some(err);
        } else {
          print_error(&err);
        }
      }
    }
  }

  match first_failure {
    Some(err) => {
      println!();
      println!("{} of {} artifact(s) failed", failed, artifacts.len());
      Err(err)
    }
    None => {
      println!();
      println!("✅ All artifacts passed");
      Ok(())
    }
  }
}
