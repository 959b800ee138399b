//! CI action entry points
//!
//! Each action is a fixed sequence of releaser CLI steps, run in order and
//! stopped at the first failure:
//!
//! - **draft_changelog**: prep-git → bump-version → build/draft changelog
//! - **draft_release**: full pre-release pipeline ending in a draft GitHub release
//! - **publish_release**: extract, forward-port, and publish a drafted release

pub mod draft_changelog;
pub mod draft_release;
pub mod publish_release;

pub use draft_changelog::run_draft_changelog;
pub use draft_release::run_draft_release;
pub use publish_release::run_publish_release;

use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;
use crate::core::process::CommandSpec;

/// Invokes `<releaser> <step> [args]` through the context's runner
pub struct ReleaserCli<'a> {
  ctx: &'a ReleaseContext,
  envs: Vec<(String, String)>,
}

impl<'a> ReleaserCli<'a> {
  pub fn new(ctx: &'a ReleaseContext) -> Self {
    Self { ctx, envs: Vec::new() }
  }

  /// Pass an environment variable to every step
  pub fn with_env(mut self, key: &str, value: &str) -> Self {
    self.envs.push((key.to_string(), value.to_string()));
    self
  }

  /// Run one step; output streams to the terminal
  pub fn step(&self, name: &str, args: &[&str]) -> ReleaseResult<()> {
    let mut spec = CommandSpec::new(&self.ctx.config.tools.releaser)
      .arg(name)
      .args(args.iter().copied())
      .current_dir(&self.ctx.root);
    for (key, value) in &self.envs {
      spec = spec.env(key.as_str(), value.as_str());
    }
    self.ctx.runner.run(&spec)?;
    Ok(())
  }

  /// Run steps in order without arguments
  pub fn steps(&self, names: &[&str]) -> ReleaseResult<()> {
    for name in names {
      self.step(name, &[])?;
    }
    Ok(())
  }
}
