//! Draft changelog action

use super::ReleaserCli;
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Bump the version and open a changelog PR
pub fn run_draft_changelog(ctx: &ReleaseContext) -> ReleaseResult<()> {
  let cli = ReleaserCli::new(ctx);
  cli.step("prep-git", &[])?;

  match find_bump_config(&ctx.root)? {
    Some(path) => println!("📄 Version config: {}", path.display()),
    None => warn!("No tbump.toml or [tool.tbump] in pyproject.toml; bump-version will use its own defaults"),
  }

  cli.steps(&["bump-version", "build-changelog", "draft-changelog"])
}

/// Locate the tbump configuration: tbump.toml, else a pyproject.toml with `[tool.tbump]`
pub fn find_bump_config(root: &Path) -> ReleaseResult<Option<PathBuf>> {
  let tbump = root.join("tbump.toml");
  if tbump.exists() {
    return Ok(Some(tbump));
  }

  let pyproject = root.join("pyproject.toml");
  if !pyproject.exists() {
    return Ok(None);
  }

  let content = fs::read_to_string(&pyproject).with_context(|| format!("Failed to read {}", pyproject.display()))?;
  let doc: toml_edit::DocumentMut = content
    .parse()
    .with_context(|| format!("Failed to parse {}", pyproject.display()))?;

  let has_tbump = doc
    .get("tool")
    .and_then(|tool| tool.get("tbump"))
    .is_some_and(|tbump| tbump.is_table_like());
  Ok(has_tbump.then_some(pyproject))
}
