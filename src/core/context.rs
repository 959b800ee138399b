//! Release context - build once, pass everywhere
//!
//! `ReleaseContext` bundles the working directory, the loaded configuration
//! and the command runner. It is built once in main.rs and passed by
//! reference to every command, so no operation reaches for process-wide
//! state on its own.

use crate::core::config::ReleaseConfig;
use crate::core::error::ReleaseResult;
use crate::core::process::{CommandRunner, SystemRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone)]
pub struct ReleaseContext {
  /// Project root (absolute path); descriptors are looked up here
  pub root: PathBuf,

  pub config: Arc<ReleaseConfig>,

  /// Executes every external command
  pub runner: Arc<dyn CommandRunner>,

  /// Stream child output instead of capturing it
  pub verbose: bool,
}

impl ReleaseContext {
  /// Build the context from the process environment
  pub fn build(root: &Path) -> ReleaseResult<Self> {
    let config = ReleaseConfig::load(root, |key| std::env::var(key).ok())?;
    Ok(Self::new(root, config, Arc::new(SystemRunner)))
  }

  pub fn new(root: &Path, config: ReleaseConfig, runner: Arc<dyn CommandRunner>) -> Self {
    Self {
      root: root.to_path_buf(),
      config: Arc::new(config),
      runner,
      verbose: false,
    }
  }

  pub fn with_verbose(mut self, verbose: bool) -> Self {
    self.verbose = verbose;
    self
  }

  /// Resolve a configured path against the project root
  pub fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  /// Dist directory from config, resolved against the root
  pub fn dist_dir(&self) -> PathBuf {
    self.resolve(&self.config.python.dist_dir)
  }
}
