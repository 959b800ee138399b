//! Tests for the `build-python` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_build_without_descriptor_is_noop() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_release_rail(&project.path, &["build-python"], &[])?;

  assert!(stdout(&output).contains("Nothing was built"));
  assert!(project.file_exists("dist"));
  Ok(())
}

#[test]
fn test_build_removes_stale_artifacts() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("dist/old-0.0.1.tar.gz", "stale")?;
  project.write_file("dist/old-0.0.1-py3-none-any.whl", "stale")?;
  project.write_file("dist/notes.txt", "keep me")?;

  run_release_rail(&project.path, &["build-python"], &[])?;

  assert!(!project.file_exists("dist/old-0.0.1.tar.gz"));
  assert!(!project.file_exists("dist/old-0.0.1-py3-none-any.whl"));
  assert!(project.file_exists("dist/notes.txt"));
  Ok(())
}

#[test]
fn test_build_strict_descriptor_fails() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("release.toml", "[python]\nrequire_descriptor = true\n")?;

  let output = run_release_rail_raw(&project.path, &["build-python"], &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("pyproject.toml"));
  Ok(())
}

#[test]
fn test_build_honours_dist_dir_env() -> Result<()> {
  let project = TestProject::new()?;

  run_release_rail(&project.path, &["build-python"], &[("RH_DIST_DIR", "out/python")])?;

  assert!(project.file_exists("out/python"));
  assert!(!project.file_exists("dist"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_build_with_frontend_lists_artifacts() -> Result<()> {
  let project = TestProject::with_pyproject("my-pkg")?;
  // Invoked as: <python> -m build --outdir <dist> .
  let python = project.write_script(
    "tools/python",
    r#"touch "$4/my_pkg-0.1.0.tar.gz" "$4/my_pkg-0.1.0-py3-none-any.whl""#,
  )?;
  project.write_file("release.toml", &format!("[tools]\npython = \"{}\"\n", python.display()))?;

  let output = run_release_rail(&project.path, &["build-python", "--json"], &[])?;

  let reports: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  let reports = reports.as_array().expect("json array");
  assert_eq!(reports.len(), 2);
  assert!(reports.iter().all(|r| r["name"] == "my_pkg"));
  assert!(reports.iter().all(|r| r["sha256"].as_str().map(str::len) == Some(64)));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_build_failure_reports_tool_output() -> Result<()> {
  let project = TestProject::with_pyproject("broken")?;
  let python = project.write_script("tools/python", "echo 'backend exploded' >&2\nexit 3")?;
  project.write_file("release.toml", &format!("[tools]\npython = \"{}\"\n", python.display()))?;

  let output = run_release_rail_raw(&project.path, &["build-python"], &[])?;

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("backend exploded"));
  Ok(())
}
