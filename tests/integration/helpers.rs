//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Variables the binary reads at startup; scrubbed so the host CI cannot leak in
const SCRUBBED_ENV: &[&str] = &[
  "PYPI_TOKEN",
  "PYPI_TOKEN_MAP",
  "RH_RELEASE_URL",
  "release_url",
  "RH_DIST_DIR",
  "RH_PYDIST_CHECK_CMD",
  "RH_IS_CHECK_RELEASE",
  "RH_CHANGELOG",
  "TWINE_USERNAME",
  "TWINE_PASSWORD",
  "RELEASE_RAIL_LOG",
];

/// A scratch python project
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Empty project directory (no descriptor)
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Project with a minimal pyproject.toml
  pub fn with_pyproject(name: &str) -> Result<Self> {
    let project = Self::new()?;
    project.write_file(
      "pyproject.toml",
      &format!(
        r#"[build-system]
requires = ["hatchling"]
build-backend = "hatchling.build"

[project]
name = "{}"
version = "0.1.0"
"#,
        name
      ),
    )?;
    Ok(project)
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<PathBuf> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&full, content).with_context(|| format!("Failed to write {}", full.display()))?;
    Ok(full)
  }

  /// Write an executable shell script (unix only)
  #[cfg(unix)]
  pub fn write_script(&self, path: &str, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let full = self.write_file(path, &format!("#!/bin/sh\n{}\n", body))?;
    let mut perms = std::fs::metadata(&full)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&full, perms)?;
    Ok(full)
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run release-rail; returns the raw output whether or not it succeeded
pub fn run_release_rail_raw(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_release-rail");

  let mut command = Command::new(bin);
  command.current_dir(cwd).args(args);
  for key in SCRUBBED_ENV {
    command.env_remove(key);
  }
  for (key, value) in envs {
    command.env(key, value);
  }

  command.output().context("Failed to run release-rail")
}

/// Run release-rail and fail unless it exits successfully
pub fn run_release_rail(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let output = run_release_rail_raw(cwd, args, envs)?;

  if !output.status.success() {
    anyhow::bail!(
      "release-rail command failed: release-rail {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout(&output),
      stderr(&output)
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
