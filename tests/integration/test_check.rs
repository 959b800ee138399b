//! Tests for the `check-python` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_check_without_artifacts_fails() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::create_dir_all(project.path.join("dist"))?;

  let output = run_release_rail_raw(&project.path, &["check-python"], &[])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("No artifacts found"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_check_reports_every_failing_artifact() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("dist/aaa-1.0.0.tar.gz", "sdist")?;
  project.write_file("dist/bbb-1.0.0.tar.gz", "sdist")?;
  // Invoked as: <twine> check <artifact>
  let twine = project.write_script("tools/twine", r#"echo "BROKEN-$(basename "$2")"; exit 1"#)?;
  project.write_file("release.toml", &format!("[tools]\ntwine = \"{}\"\n", twine.display()))?;

  let output = run_release_rail_raw(&project.path, &["check-python"], &[])?;

  assert_eq!(output.status.code(), Some(3));
  let err = stderr(&output);
  assert!(err.contains("BROKEN-aaa-1.0.0.tar.gz"));
  assert!(err.contains("BROKEN-bbb-1.0.0.tar.gz"));
  assert!(stdout(&output).contains("2 of 2 artifact(s) failed"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_check_passes_with_working_tools() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("dist/pkg-1.0.0.tar.gz", "sdist")?;
  project.write_file("dist/pkg-1.0.0-py3-none-any.whl", "wheel")?;
  let twine = project.write_script("tools/twine", "exit 0")?;
  // `python -m venv <dir>` lays down stub python/pip executables that succeed
  let python = project.write_script(
    "tools/python",
    r#"if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin"
  for tool in python pip; do
    printf '#!/bin/sh\nexit 0\n' > "$3/bin/$tool"
    chmod +x "$3/bin/$tool"
  done
fi"#,
  )?;
  project.write_file(
    "release.toml",
    &format!(
      "[tools]\ntwine = \"{}\"\npython = \"{}\"\n",
      twine.display(),
      python.display()
    ),
  )?;

  let output = run_release_rail(&project.path, &["check-python"], &[])?;

  assert!(stdout(&output).contains("All artifacts passed"));
  Ok(())
}
