//! Publish release action

use super::ReleaserCli;
use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;

/// Publish a drafted release: extract assets, forward-port the changelog, publish
pub fn run_publish_release(ctx: &ReleaseContext) -> ReleaseResult<()> {
  let release_url = ctx.config.require_release_url()?;
  let cli = ReleaserCli::new(ctx).with_env("TWINE_USERNAME", &ctx.config.publish.twine_username);

  for step in ["extract-release", "forwardport-changelog", "publish-release"] {
    cli.step(step, &[release_url])?;
  }
  Ok(())
}
