//! Built distribution files (sdists and wheels)

use crate::core::error::{DistError, ReleaseResult, ResultExt};
use crate::utils::file_name_str;
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Leading non-whitespace run followed by `-<digit>`; greedy, so the last
/// `-<digit>` in the name is taken as the version start.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)-\d").expect("valid artifact name pattern"));

/// Glob patterns the builder owns inside the dist directory
pub const ARTIFACT_PATTERNS: [&str; 2] = ["*.gz", "*.whl"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
  Sdist,
  Wheel,
}

impl fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ArtifactKind::Sdist => write!(f, "sdist"),
      ArtifactKind::Wheel => write!(f, "wheel"),
    }
  }
}

/// A single built package file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  pub path: PathBuf,
  /// Distribution name as it appears in the file name
  pub name: String,
  pub version: String,
  pub kind: ArtifactKind,
}

impl Artifact {
  /// Parse name, version and kind from the file name
  pub fn from_path(path: &Path) -> ReleaseResult<Self> {
    let file_name = file_name_str(path);
    let name = package_name(&file_name)?;

    let kind = if file_name.ends_with(".whl") {
      ArtifactKind::Wheel
    } else {
      ArtifactKind::Sdist
    };

    let rest = &file_name[name.len() + 1..];
    let version = match kind {
      ArtifactKind::Wheel => rest.split('-').next().unwrap_or(rest).to_string(),
      ArtifactKind::Sdist => strip_sdist_suffix(rest).to_string(),
    };

    Ok(Self {
      path: path.to_path_buf(),
      name,
      version,
      kind,
    })
  }

  /// Importable module name (distribution-name → import-name)
  pub fn import_name(&self) -> String {
    self.name.replace('-', "_")
  }

  pub fn file_name(&self) -> String {
    file_name_str(&self.path)
  }

  /// Hex-encoded sha256 of the file contents
  pub fn sha256(&self) -> ReleaseResult<String> {
    let mut file = File::open(&self.path).with_context(|| format!("Failed to open {}", self.path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).with_context(|| format!("Failed to read {}", self.path.display()))?;
    Ok(
      hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect(),
    )
  }
}

/// Distribution name from an artifact file name
///
/// `my-pkg-1.0.0.tar.gz` → `my-pkg`. Names that themselves contain
/// `-<digit>` are ambiguous and resolve to the longest prefix.
pub fn package_name(file_name: &str) -> ReleaseResult<String> {
  NAME_PATTERN
    .captures(file_name)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().to_string())
    .ok_or_else(|| {
      DistError::InvalidArtifactName {
        file_name: file_name.to_string(),
      }
      .into()
    })
}

fn strip_sdist_suffix(rest: &str) -> &str {
  for suffix in [".tar.gz", ".zip", ".gz"] {
    if let Some(stripped) = rest.strip_suffix(suffix) {
      return stripped;
    }
  }
  rest
}

/// Artifacts currently present in `dir`, sorted by file name
pub fn list_artifacts(dir: &Path) -> ReleaseResult<Vec<Artifact>> {
  let mut paths = artifact_paths(dir)?;
  paths.sort();
  paths.iter().map(|p| Artifact::from_path(p)).collect()
}

/// Paths matching the artifact patterns, without parsing them
pub fn artifact_paths(dir: &Path) -> ReleaseResult<Vec<PathBuf>> {
  // The directory itself may contain glob metacharacters
  let base = PathBuf::from(glob::Pattern::escape(&dir.to_string_lossy()));
  let mut paths = Vec::new();
  for pattern in ARTIFACT_PATTERNS {
    let full = base.join(pattern);
    for entry in glob::glob(&full.to_string_lossy())? {
      let path = entry?;
      if path.is_file() {
        paths.push(path);
      }
    }
  }
  Ok(paths)
}
