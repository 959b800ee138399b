//! External process execution
//!
//! Every tool release-rail drives (python, twine, pip, the releaser CLI) goes
//! through [`CommandRunner`]. The system implementation blocks until the child
//! exits. Quiet commands capture their output and only surface it inside the
//! error when the child fails; loud commands inherit the parent's stdio.

use crate::core::error::{ProcessError, ReleaseError, ReleaseResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  /// Extra environment for the child. Values are never logged.
  pub envs: Vec<(String, String)>,
  pub cwd: Option<PathBuf>,
  pub quiet: bool,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      envs: Vec::new(),
      cwd: None,
      quiet: false,
    }
  }

  /// Program given as a filesystem path (e.g. a venv executable)
  pub fn from_path(program: &Path) -> Self {
    Self::new(program.to_string_lossy().into_owned())
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn path_arg(self, path: &Path) -> Self {
    self.arg(path.to_string_lossy().into_owned())
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.envs.push((key.into(), value.into()));
    self
  }

  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn quiet(mut self, quiet: bool) -> Self {
    self.quiet = quiet;
    self
  }

  /// Look up an environment override set on this spec
  pub fn env_value(&self, key: &str) -> Option<&str> {
    self.envs.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", quote_word(&self.program))?;
    for arg in &self.args {
      write!(f, " {}", quote_word(arg))?;
    }
    Ok(())
  }
}

fn quote_word(word: &str) -> String {
  match shlex::try_quote(word) {
    Ok(quoted) => quoted.into_owned(),
    Err(_) => word.to_string(),
  }
}

/// Output of a successful command
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
  pub stdout: String,
  pub stderr: String,
}

/// Executes external commands
///
/// A non-zero exit is always an error; callers never have to inspect a status.
pub trait CommandRunner: Send + Sync {
  fn run(&self, spec: &CommandSpec) -> ReleaseResult<CommandOutput>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, spec: &CommandSpec) -> ReleaseResult<CommandOutput> {
    let line = spec.to_string();
    info!("> {}", line);

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    for (key, value) in &spec.envs {
      cmd.env(key, value);
    }
    if let Some(dir) = &spec.cwd {
      cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null());

    let spawn_err = |e: std::io::Error| {
      ReleaseError::Process(ProcessError::SpawnFailed {
        command: line.clone(),
        reason: e.to_string(),
      })
    };

    if spec.quiet {
      let output = cmd.output().map_err(spawn_err)?;
      let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
      let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
      if !output.status.success() {
        let mut combined = stdout;
        combined.push_str(&stderr);
        return Err(ReleaseError::Process(ProcessError::Failed {
          command: line,
          code: output.status.code(),
          output: combined,
        }));
      }
      debug!("{} finished ({} bytes of output)", spec.program, stdout.len() + stderr.len());
      Ok(CommandOutput { stdout, stderr })
    } else {
      let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(spawn_err)?;
      if !status.success() {
        return Err(ReleaseError::Process(ProcessError::Failed {
          command: line,
          code: status.code(),
          output: String::new(),
        }));
      }
      Ok(CommandOutput::default())
    }
  }
}

/// Split a user-supplied command line into words (POSIX shell rules)
pub fn split_command_line(line: &str) -> ReleaseResult<Vec<String>> {
  let words = shlex::split(line)
    .ok_or_else(|| ReleaseError::message(format!("Unbalanced quotes in command: {}", line)))?;
  match words.first() {
    None => return Err(ReleaseError::message("Command is empty")),
    Some(program) if program.trim().is_empty() => {
      return Err(ReleaseError::message(format!("Command has no program: {}", line)));
    }
    Some(_) => {}
  }
  Ok(words)
}
