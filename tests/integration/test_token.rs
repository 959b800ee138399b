//! Tests for the `resolve-token` command

use crate::helpers::*;
use anyhow::Result;

const SECRET: &str = "pypi-AgEIcHlwaS5vcmc-secret";
const MAP: &str = "jupyter/foo,pypi-foo-secret\\njupyter/bar,pypi-bar-secret";

#[test]
fn test_direct_token_is_reported_not_printed() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_release_rail(&project.path, &["resolve-token", "-vv"], &[("PYPI_TOKEN", SECRET)])?;

  assert!(stdout(&output).contains("PyPI token found (from PYPI_TOKEN)"));
  assert!(!stdout(&output).contains(SECRET));
  assert!(!stderr(&output).contains(SECRET));
  Ok(())
}

#[test]
fn test_map_entry_selected_by_release_url() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_release_rail(
    &project.path,
    &[
      "resolve-token",
      "--json",
      "--release-url",
      "https://github.com/jupyter/bar/releases/tag/untagged-1",
    ],
    &[("PYPI_TOKEN_MAP", MAP), ("PYPI_TOKEN", SECRET)],
  )?;

  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(report["found"], true);
  assert_eq!(report["source"], "PYPI_TOKEN_MAP");
  assert_eq!(report["repository"], "jupyter/bar");
  assert!(!stdout(&output).contains("pypi-bar-secret"));
  Ok(())
}

#[test]
fn test_unmatched_repo_falls_back_to_direct_token() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_release_rail(
    &project.path,
    &["resolve-token", "--json"],
    &[
      ("PYPI_TOKEN_MAP", MAP),
      ("PYPI_TOKEN", SECRET),
      ("RH_RELEASE_URL", "https://github.com/other/repo/releases/tag/v1"),
    ],
  )?;

  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(report["source"], "PYPI_TOKEN");
  assert_eq!(report["repository"], "other/repo");
  Ok(())
}

#[test]
fn test_no_token_is_not_an_error() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_release_rail(&project.path, &["resolve-token", "--json"], &[])?;

  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(report["found"], false);
  assert_eq!(report["source"], "none");
  assert!(report["repository"].is_null());
  Ok(())
}

#[test]
fn test_env_file_receives_token() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("github_env", "EXISTING=1\n")?;

  let output = run_release_rail(
    &project.path,
    &["resolve-token", "--env-file", "github_env"],
    &[("PYPI_TOKEN", SECRET)],
  )?;

  let env_file = project.read_file("github_env")?;
  assert!(env_file.starts_with("EXISTING=1\n"));
  assert!(env_file.contains(&format!("TWINE_PASSWORD={}", SECRET)));
  assert!(!stdout(&output).contains(SECRET));
  Ok(())
}

#[test]
fn test_env_file_untouched_without_token() -> Result<()> {
  let project = TestProject::new()?;

  run_release_rail(&project.path, &["resolve-token", "--env-file", "github_env"], &[])?;

  assert!(!project.file_exists("github_env"));
  Ok(())
}
