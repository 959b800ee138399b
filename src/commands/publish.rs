//! `publish-python` command

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::python::{Artifact, LocalIndex, list_artifacts, publish_dist};
use std::path::PathBuf;

pub fn run_publish_python(
  ctx: &ReleaseContext,
  files: Vec<PathBuf>,
  dist_dir: Option<PathBuf>,
  local_index: bool,
) -> ReleaseResult<()> {
  let artifacts = if files.is_empty() {
    let dist_dir = dist_dir.map(|d| ctx.resolve(&d)).unwrap_or_else(|| ctx.dist_dir());
    list_artifacts(&dist_dir)?
  } else {
    files
      .iter()
      .map(|f| Artifact::from_path(&ctx.resolve(f)))
      .collect::<ReleaseResult<Vec<_>>>()?
  };

  if artifacts.is_empty() {
    return Err(ReleaseError::with_help(
      "No artifacts to publish",
      "Run `release-rail build-python` first, or pass artifact paths explicitly.",
    ));
  }

  // Held until every upload finishes; dropping it stops the server
  let index = if local_index {
    println!("🧪 Starting local package index");
    let index = LocalIndex::start(&ctx.config.index)?;
    println!("   packages: {}", index.packages_dir().display());
    Some(index)
  } else {
    None
  };

  let target = index.as_ref().map(|i| i.url().to_string()).unwrap_or_else(|| {
    ctx
      .config
      .publish
      .repository_url
      .clone()
      .unwrap_or_else(|| "PyPI".to_string())
  });
  println!("📤 Publishing {} artifact(s) to {}", artifacts.len(), target);

  let uploaded = publish_dist(ctx, &artifacts, index.as_ref())?;

  println!();
  println!("✅ Published {} artifact(s)", uploaded);
  Ok(())
}
