//! Tests for the `action` subcommands
//!
//! The releaser CLI is replaced by a script that logs its arguments.

use crate::helpers::*;
use anyhow::Result;

#[cfg(unix)]
fn project_with_fake_releaser() -> Result<TestProject> {
  let project = TestProject::new()?;
  let log = project.path.join("releaser.log");
  let releaser = project.write_script(
    "tools/releaser",
    &format!(r#"echo "$1 url=$2 user=$TWINE_USERNAME" >> "{}""#, log.display()),
  )?;
  project.write_file(
    "release.toml",
    &format!("[tools]\nreleaser = \"{}\"\n", releaser.display()),
  )?;
  Ok(project)
}

#[cfg(unix)]
fn steps(project: &TestProject) -> Result<Vec<String>> {
  Ok(
    project
      .read_file("releaser.log")?
      .lines()
      .map(|l| l.split_whitespace().next().unwrap_or_default().to_string())
      .collect(),
  )
}

#[test]
fn test_publish_release_requires_url() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_release_rail_raw(&project.path, &["action", "publish-release"], &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("RH_RELEASE_URL"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_publish_release_runs_steps_with_url() -> Result<()> {
  let project = project_with_fake_releaser()?;
  let url = "https://github.com/jupyter/pkg/releases/tag/untagged-1";

  run_release_rail(&project.path, &["action", "publish-release", "--release-url", url], &[])?;

  assert_eq!(
    steps(&project)?,
    ["extract-release", "forwardport-changelog", "publish-release"]
  );
  let log = project.read_file("releaser.log")?;
  assert!(log.lines().all(|l| l.contains(&format!("url={}", url))));
  assert!(log.lines().all(|l| l.ends_with("user=__token__")));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_draft_changelog_runs_steps_in_order() -> Result<()> {
  let project = project_with_fake_releaser()?;
  project.write_file("tbump.toml", "[version]\ncurrent = \"0.1.0\"\n")?;

  let output = run_release_rail(&project.path, &["action", "draft-changelog"], &[])?;

  assert_eq!(
    steps(&project)?,
    ["prep-git", "bump-version", "build-changelog", "draft-changelog"]
  );
  assert!(stdout(&output).contains("tbump.toml"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_draft_release_stops_at_first_failing_step() -> Result<()> {
  let project = TestProject::new()?;
  let log = project.path.join("releaser.log");
  let releaser = project.write_script(
    "tools/releaser",
    &format!(
      "echo \"$1\" >> \"{}\"\nif [ \"$1\" = \"build-python\" ]; then exit 1; fi",
      log.display()
    ),
  )?;
  project.write_file("release.toml", &format!("[tools]\nreleaser = \"{}\"\n", releaser.display()))?;

  let output = run_release_rail_raw(&project.path, &["action", "draft-release"], &[])?;

  assert!(!output.status.success());
  let ran = project.read_file("releaser.log")?;
  assert!(ran.lines().any(|l| l == "build-python"));
  assert!(!ran.lines().any(|l| l == "draft-release"));
  Ok(())
}
