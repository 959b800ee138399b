//! Error types for release-rail with contextual messages and exit codes
//!
//! Every failure surfaces immediately to the caller; nothing in this crate
//! retries. Errors carry an optional help line that `print_error` shows
//! below the message.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for release-rail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (external process, I/O)
  System = 2,
  /// Validation failure (artifact checks failed)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for release-rail
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors
  Config(ConfigError),

  /// Distribution build/check/publish errors
  Dist(DistError),

  /// External process errors
  Process(ProcessError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Io(err) => ReleaseError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::User,
      ReleaseError::Dist(e) => e.exit_code(),
      ReleaseError::Process(_) => ExitCode::System,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Dist(e) => e.help_message(),
      ReleaseError::Process(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Dist(e) => write!(f, "{}", e),
      ReleaseError::Process(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<ConfigError> for ReleaseError {
  fn from(err: ConfigError) -> Self {
    ReleaseError::Config(err)
  }
}

impl From<DistError> for ReleaseError {
  fn from(err: DistError) -> Self {
    ReleaseError::Dist(err)
  }
}

impl From<ProcessError> for ReleaseError {
  fn from(err: ProcessError) -> Self {
    ReleaseError::Process(err)
  }
}

impl From<toml_edit::TomlError> for ReleaseError {
  fn from(err: toml_edit::TomlError) -> Self {
    ReleaseError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<glob::PatternError> for ReleaseError {
  fn from(err: glob::PatternError) -> Self {
    ReleaseError::message(format!("Invalid glob pattern: {}", err))
  }
}

impl From<glob::GlobError> for ReleaseError {
  fn from(err: glob::GlobError) -> Self {
    ReleaseError::message(format!("Failed to read directory entry: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A required value was not provided by file, environment, or flag
  MissingValue { field: String, env_var: Option<String> },

  /// A value was provided but could not be used
  InvalidValue { field: String, value: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingValue {
        env_var: Some(var), ..
      } => Some(format!("Set {} or add the value to release.toml.", var)),
      ConfigError::MissingValue { field, .. } => Some(format!("Add `{}` to release.toml.", field)),
      ConfigError::InvalidValue { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingValue { field, .. } => {
        write!(f, "Missing required configuration value: {}", field)
      }
      ConfigError::InvalidValue { field, value, reason } => {
        write!(f, "Invalid value '{}' for {}: {}", value, field, reason)
      }
    }
  }
}

/// Python distribution errors
#[derive(Debug)]
pub enum DistError {
  /// A build frontend or setup.py invocation exited non-zero
  BuildFailed { command: String, output: String },

  /// Metadata check or installed-package test exited non-zero
  CheckFailed {
    artifact: PathBuf,
    command: String,
    output: String,
  },

  /// Neither pyproject.toml nor setup.py exists (strict mode only)
  NoDescriptor { dir: PathBuf },

  /// Artifact file name does not start with `<name>-<digit>`
  InvalidArtifactName { file_name: String },

  /// Publishing without any credential
  MissingCredential { repository: Option<String> },

  /// Local package index never reported readiness
  IndexNotReady { reason: String },
}

impl DistError {
  fn exit_code(&self) -> ExitCode {
    match self {
      DistError::BuildFailed { .. } => ExitCode::System,
      DistError::CheckFailed { .. } => ExitCode::Validation,
      DistError::NoDescriptor { .. } => ExitCode::User,
      DistError::InvalidArtifactName { .. } => ExitCode::User,
      DistError::MissingCredential { .. } => ExitCode::User,
      DistError::IndexNotReady { .. } => ExitCode::System,
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      DistError::NoDescriptor { .. } => {
        Some("Add a pyproject.toml (or setup.py), or set require_descriptor = false.".to_string())
      }
      DistError::InvalidArtifactName { .. } => {
        Some("Pass an explicit --test-cmd so the import name does not have to be guessed.".to_string())
      }
      DistError::MissingCredential { .. } => {
        Some("Set PYPI_TOKEN, or add an `owner/repo,token` line to PYPI_TOKEN_MAP.".to_string())
      }
      DistError::IndexNotReady { .. } => Some("Check that pypi-server is installed and the port is free.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for DistError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DistError::BuildFailed { command, output } => {
        write!(f, "Build failed: {}", command)?;
        if !output.trim().is_empty() {
          write!(f, "\n{}", output.trim_end())?;
        }
        Ok(())
      }
      DistError::CheckFailed {
        artifact,
        command,
        output,
      } => {
        write!(f, "Check failed for {}: {}", artifact.display(), command)?;
        if !output.trim().is_empty() {
          write!(f, "\n{}", output.trim_end())?;
        }
        Ok(())
      }
      DistError::NoDescriptor { dir } => {
        write!(f, "No pyproject.toml or setup.py found in {}", dir.display())
      }
      DistError::InvalidArtifactName { file_name } => {
        write!(f, "Cannot derive a package name from '{}'", file_name)
      }
      DistError::MissingCredential { repository } => match repository {
        Some(repo) => write!(f, "No PyPI token found for {}", repo),
        None => write!(f, "No PyPI token found"),
      },
      DistError::IndexNotReady { reason } => {
        write!(f, "Local package index did not start: {}", reason)
      }
    }
  }
}

/// External process errors
#[derive(Debug)]
pub enum ProcessError {
  /// The program could not be started at all
  SpawnFailed { command: String, reason: String },

  /// The program ran and exited unsuccessfully
  Failed {
    command: String,
    code: Option<i32>,
    output: String,
  },
}

impl ProcessError {
  /// The command line that failed
  pub fn command(&self) -> &str {
    match self {
      ProcessError::SpawnFailed { command, .. } | ProcessError::Failed { command, .. } => command,
    }
  }

  /// Captured output (or spawn failure reason)
  pub fn output(&self) -> &str {
    match self {
      ProcessError::SpawnFailed { reason, .. } => reason,
      ProcessError::Failed { output, .. } => output,
    }
  }

  fn help_message(&self) -> Option<String> {
    match self {
      ProcessError::SpawnFailed { command, .. } => {
        let program = command.split_whitespace().next().unwrap_or(command);
        Some(format!("Make sure `{}` is installed and on PATH.", program))
      }
      ProcessError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for ProcessError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ProcessError::SpawnFailed { command, reason } => {
        write!(f, "Failed to run {}: {}", command, reason)
      }
      ProcessError::Failed { command, code, output } => {
        match code {
          Some(code) => write!(f, "Command failed with exit code {}: {}", code, command)?,
          None => write!(f, "Command terminated by signal: {}", command)?,
        }
        if !output.trim().is_empty() {
          write!(f, "\n{}", output.trim_end())?;
        }
        Ok(())
      }
    }
  }
}

/// Result type alias for release-rail
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

impl From<anyhow::Error> for ReleaseError {
  fn from(err: anyhow::Error) -> Self {
    ReleaseError::message(err.to_string())
  }
}
