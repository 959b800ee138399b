//! Draft release action
//!
//! In check-release mode the changelog written by the caller is preserved
//! across bump-version, and the releaser is reinstalled from the parent
//! checkout instead of the cloned one.

use super::ReleaserCli;
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::core::process::CommandSpec;
use std::fs;
use tracing::info;

/// Steps after bump-version; npm is built before python in case it
/// produces files the python package ships.
pub const RELEASE_STEPS: [&str; 9] = [
  "check-changelog",
  "check-links",
  "build-npm",
  "check-npm",
  "build-python",
  "check-python",
  "check-manifest",
  "tag-release",
  "draft-release",
];

pub fn run_draft_release(ctx: &ReleaseContext) -> ReleaseResult<()> {
  let actions = &ctx.config.actions;
  let cli = ReleaserCli::new(ctx);

  let saved_changelog = if actions.check_release {
    println!("🔍 Handling check release");
    Some(prepare_check_release(ctx)?)
  } else {
    None
  };

  cli.steps(&["prep-git", "bump-version"])?;

  if let Some(text) = saved_changelog {
    let path = ctx.resolve(&actions.changelog);
    fs::write(&path, text).with_context(|| format!("Failed to restore {}", path.display()))?;
    info!("Restored {}", path.display());
  }

  cli.steps(&RELEASE_STEPS)
}

/// Save the changelog, drop the releaser checkout, reinstall from the parent dir
fn prepare_check_release(ctx: &ReleaseContext) -> ReleaseResult<String> {
  let actions = &ctx.config.actions;
  let changelog = ctx.resolve(&actions.changelog);
  let text = fs::read_to_string(&changelog).with_context(|| format!("Failed to read {}", changelog.display()))?;

  let checkout = ctx.resolve(&actions.checkout_dir);
  if checkout.exists() {
    fs::remove_dir_all(&checkout).with_context(|| format!("Failed to remove {}", checkout.display()))?;
  }

  info!("Parent dir is {}", ctx.root.display());
  let install = CommandSpec::new(&ctx.config.tools.python)
    .args(["-m", "pip", "install", "-e", "."])
    .current_dir(&ctx.root);
  ctx.runner.run(&install)?;

  Ok(text)
}
