use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables read while loading configuration
pub mod env_vars {
  pub const PYPI_TOKEN: &str = "PYPI_TOKEN";
  pub const PYPI_TOKEN_MAP: &str = "PYPI_TOKEN_MAP";
  pub const RELEASE_URL: &str = "RH_RELEASE_URL";
  /// Name used by the publish-release workflow input
  pub const RELEASE_URL_INPUT: &str = "release_url";
  pub const DIST_DIR: &str = "RH_DIST_DIR";
  pub const CHECK_CMD: &str = "RH_PYDIST_CHECK_CMD";
  pub const IS_CHECK_RELEASE: &str = "RH_IS_CHECK_RELEASE";
  pub const CHANGELOG: &str = "RH_CHANGELOG";
  pub const TWINE_USERNAME: &str = "TWINE_USERNAME";
}

/// Configuration for release-rail
///
/// Searched in order: release.toml, .release.toml, .config/release.toml.
/// Environment variables override the file; CLI flags override both.
/// Nothing past loading reads the process environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
  pub python: PythonConfig,
  pub tools: ToolsConfig,
  pub publish: PublishConfig,
  pub index: IndexConfig,
  pub actions: ActionsConfig,
  /// Credentials only ever come from the environment
  #[serde(skip)]
  pub tokens: TokenConfig,
}

/// Python distribution build/check settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
  /// Output directory for sdists and wheels
  pub dist_dir: PathBuf,
  /// Command run inside the check environment (default: import the package)
  pub test_cmd: Option<String>,
  /// Treat a missing pyproject.toml/setup.py as an error instead of a no-op
  pub require_descriptor: bool,
}

impl Default for PythonConfig {
  fn default() -> Self {
    Self {
      dist_dir: PathBuf::from("dist"),
      test_cmd: None,
      require_descriptor: false,
    }
  }
}

/// External program names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
  pub python: String,
  pub twine: String,
  pub releaser: String,
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      python: "python".to_string(),
      twine: "twine".to_string(),
      releaser: "jupyter-releaser".to_string(),
    }
  }
}

/// Publish settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
  /// GitHub release URL, e.g. https://github.com/owner/repo/releases/tag/v1.0.0
  pub release_url: Option<String>,
  pub twine_username: String,
  /// Upload target (default: twine's own default, PyPI)
  pub repository_url: Option<String>,
}

impl Default for PublishConfig {
  fn default() -> Self {
    Self {
      release_url: None,
      twine_username: "__token__".to_string(),
      repository_url: None,
    }
  }
}

/// Local package index (pypi-server) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
  pub program: String,
  pub port: u16,
  /// Upper bound on the readiness wait
  pub timeout_secs: u64,
  /// Upper bound on stderr lines read while waiting
  pub max_lines: usize,
}

impl Default for IndexConfig {
  fn default() -> Self {
    Self {
      program: "pypi-server".to_string(),
      port: 8081,
      timeout_secs: 30,
      max_lines: 200,
    }
  }
}

impl IndexConfig {
  pub fn url(&self) -> String {
    format!("http://localhost:{}", self.port)
  }
}

/// CI action settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
  pub changelog: PathBuf,
  /// Checkout the releaser CLI clones into; removed in check-release mode
  pub checkout_dir: PathBuf,
  pub check_release: bool,
}

impl Default for ActionsConfig {
  fn default() -> Self {
    Self {
      changelog: PathBuf::from("CHANGELOG.md"),
      checkout_dir: PathBuf::from(".jupyter_releaser_checkout"),
      check_release: false,
    }
  }
}

/// Publish credentials
///
/// `direct` is a single token; `map` is `owner/repo,token` lines.
#[derive(Clone, Default)]
pub struct TokenConfig {
  pub direct: String,
  pub map: String,
}

impl fmt::Debug for TokenConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TokenConfig")
      .field("direct", &if self.direct.is_empty() { "<unset>" } else { "<redacted>" })
      .field("map", &if self.map.is_empty() { "<unset>" } else { "<redacted>" })
      .finish()
  }
}

impl ReleaseConfig {
  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("release.toml"),
      path.join(".release.toml"),
      path.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config: file (optional) → environment → validation
  pub fn load<F>(path: &Path, env: F) -> ReleaseResult<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut config = match Self::find_config_path(path) {
      Some(config_path) => {
        let content = fs::read_to_string(&config_path)
          .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
        toml_edit::de::from_str::<ReleaseConfig>(&content)
          .with_context(|| format!("Failed to parse config from {}", config_path.display()))?
      }
      None => ReleaseConfig::default(),
    };

    config.apply_env(env);
    config.validate()?;
    Ok(config)
  }

  /// Overlay values from the environment
  ///
  /// Empty variables are treated as unset.
  pub fn apply_env<F>(&mut self, env: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(token) = get(env_vars::PYPI_TOKEN) {
      self.tokens.direct = token;
    }
    if let Some(map) = get(env_vars::PYPI_TOKEN_MAP) {
      self.tokens.map = map;
    }
    if let Some(url) = get(env_vars::RELEASE_URL).or_else(|| get(env_vars::RELEASE_URL_INPUT)) {
      self.publish.release_url = Some(url);
    }
    if let Some(dir) = get(env_vars::DIST_DIR) {
      self.python.dist_dir = PathBuf::from(dir);
    }
    if let Some(cmd) = get(env_vars::CHECK_CMD) {
      self.python.test_cmd = Some(cmd);
    }
    if let Some(flag) = get(env_vars::IS_CHECK_RELEASE) {
      self.actions.check_release = flag.eq_ignore_ascii_case("true");
    }
    if let Some(changelog) = get(env_vars::CHANGELOG) {
      self.actions.changelog = PathBuf::from(changelog);
    }
    if let Some(username) = get(env_vars::TWINE_USERNAME) {
      self.publish.twine_username = username;
    }
  }

  pub fn validate(&self) -> ReleaseResult<()> {
    if self.index.port == 0 {
      return Err(invalid("index.port", "0", "port must be non-zero"));
    }
    if self.index.timeout_secs == 0 {
      return Err(invalid("index.timeout_secs", "0", "the readiness wait needs a timeout"));
    }
    if self.index.max_lines == 0 {
      return Err(invalid("index.max_lines", "0", "at least one line must be read"));
    }
    for (field, value) in [
      ("tools.python", &self.tools.python),
      ("tools.twine", &self.tools.twine),
      ("tools.releaser", &self.tools.releaser),
      ("index.program", &self.index.program),
    ] {
      if value.trim().is_empty() {
        return Err(invalid(field, value, "program name must not be empty"));
      }
    }
    Ok(())
  }

  /// Release URL or a config error naming the variable to set
  pub fn require_release_url(&self) -> ReleaseResult<&str> {
    self.publish.release_url.as_deref().ok_or_else(|| {
      ReleaseError::Config(ConfigError::MissingValue {
        field: "publish.release_url".to_string(),
        env_var: Some(env_vars::RELEASE_URL.to_string()),
      })
    })
  }
}

fn invalid(field: &str, value: &str, reason: &str) -> ReleaseError {
  ReleaseError::Config(ConfigError::InvalidValue {
    field: field.to_string(),
    value: value.to_string(),
    reason: reason.to_string(),
  })
}
