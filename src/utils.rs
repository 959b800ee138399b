//! Utility functions for cross-platform path handling

use std::path::{Path, PathBuf};

/// Make a path absolute without requiring it to exist
///
/// Relative paths are joined onto `base`; `.` components are dropped.
pub fn normalize_path(path: &Path, base: &Path) -> PathBuf {
  let joined = if path.is_absolute() {
    path.to_path_buf()
  } else {
    base.join(path)
  };
  std::path::absolute(&joined).unwrap_or(joined)
}

/// Directory holding executables inside a virtual environment
pub fn venv_bin_dir(env_path: &Path) -> PathBuf {
  #[cfg(target_os = "windows")]
  {
    env_path.join("Scripts")
  }
  #[cfg(not(target_os = "windows"))]
  {
    env_path.join("bin")
  }
}

/// File name of a path as a string (empty if the path has none)
pub fn file_name_str(path: &Path) -> String {
  path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default()
}
