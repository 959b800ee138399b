//! Tests for the `publish-python` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_publish_without_artifacts_fails() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_release_rail_raw(&project.path, &["publish-python"], &[("PYPI_TOKEN", "pypi-x")])?;

  assert!(!output.status.success());
  assert!(stderr(&output).contains("No artifacts to publish"));
  Ok(())
}

#[test]
fn test_publish_without_credential_fails() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("dist/pkg-1.0.0.tar.gz", "sdist")?;

  let output = run_release_rail_raw(
    &project.path,
    &[
      "publish-python",
      "--release-url",
      "https://github.com/jupyter/pkg/releases/tag/v1.0.0",
    ],
    &[],
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("No PyPI token found for jupyter/pkg"));
  assert!(stderr(&output).contains("PYPI_TOKEN_MAP"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_publish_hands_token_to_twine_through_env() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("dist/pkg-1.0.0.tar.gz", "sdist")?;
  project.write_file("dist/pkg-1.0.0-py3-none-any.whl", "wheel")?;
  let log = project.path.join("twine.log");
  let twine = project.write_script(
    "tools/twine",
    &format!(
      r#"echo "$TWINE_USERNAME:$TWINE_PASSWORD $*" >> "{}""#,
      log.display()
    ),
  )?;
  project.write_file("release.toml", &format!("[tools]\ntwine = \"{}\"\n", twine.display()))?;

  let output = run_release_rail(
    &project.path,
    &["publish-python"],
    &[
      ("PYPI_TOKEN_MAP", "jupyter/pkg,pypi-map-secret"),
      ("RH_RELEASE_URL", "https://github.com/jupyter/pkg/releases/tag/v1.0.0"),
    ],
  )?;

  let calls = project.read_file("twine.log")?;
  let lines: Vec<&str> = calls.lines().collect();
  assert_eq!(lines.len(), 2);
  assert!(lines.iter().all(|l| l.starts_with("__token__:pypi-map-secret upload")));
  assert!(lines[0].ends_with("pkg-1.0.0-py3-none-any.whl"));
  assert!(lines[1].ends_with("pkg-1.0.0.tar.gz"));

  assert!(stdout(&output).contains("Published 2 artifact(s)"));
  assert!(!stdout(&output).contains("pypi-map-secret"));
  assert!(!stderr(&output).contains("pypi-map-secret"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_publish_explicit_files_with_repository_url() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("dist/pkg-1.0.0.tar.gz", "sdist")?;
  project.write_file("dist/pkg-1.0.0-py3-none-any.whl", "wheel")?;
  let log = project.path.join("twine.log");
  let twine = project.write_script("tools/twine", &format!(r#"echo "$*" >> "{}""#, log.display()))?;
  project.write_file(
    "release.toml",
    &format!(
      "[tools]\ntwine = \"{}\"\n\n[publish]\nrepository_url = \"https://test.pypi.org/legacy/\"\n",
      twine.display()
    ),
  )?;

  run_release_rail(
    &project.path,
    &["publish-python", "dist/pkg-1.0.0.tar.gz"],
    &[("PYPI_TOKEN", "pypi-direct")],
  )?;

  let calls = project.read_file("twine.log")?;
  assert_eq!(calls.lines().count(), 1);
  assert!(calls.contains("upload --repository-url=https://test.pypi.org/legacy/"));
  assert!(calls.trim_end().ends_with("pkg-1.0.0.tar.gz"));
  Ok(())
}
