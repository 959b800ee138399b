//! `action` command: CI workflow entry points

use crate::actions;
use crate::core::context::ReleaseContext;
use crate::core::error::ReleaseResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
  DraftChangelog,
  DraftRelease,
  PublishRelease,
}

pub fn run_action(ctx: &ReleaseContext, kind: ActionKind) -> ReleaseResult<()> {
  let (label, result) = match kind {
    ActionKind::DraftChangelog => ("draft changelog", actions::run_draft_changelog(ctx)),
    ActionKind::DraftRelease => ("draft release", actions::run_draft_release(ctx)),
    ActionKind::PublishRelease => ("publish release", actions::run_publish_release(ctx)),
  };
  result?;

  println!();
  println!("✅ {} action completed", label);
  Ok(())
}
