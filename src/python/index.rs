//! Local package index for rehearsing uploads
//!
//! Runs `pypi-server` against a temporary package directory. Startup waits
//! for the server's "Listening on" line, bounded by a timeout and a maximum
//! number of stderr lines so a silent or chatty server cannot hang the
//! release.

use crate::core::config::IndexConfig;
use crate::core::error::{DistError, ProcessError, ReleaseError, ReleaseResult, ResultExt};
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info};

/// Marker pypi-server prints once it accepts connections
pub const READY_MARKER: &str = "Listening on";

/// A running local index
///
/// Dropping the guard kills the server and removes its package directory.
pub struct LocalIndex {
  child: Child,
  packages: TempDir,
  url: String,
}

impl LocalIndex {
  /// Start pypi-server with authentication disabled and overwrites allowed
  pub fn start(config: &IndexConfig) -> ReleaseResult<Self> {
    let packages = TempDir::new().context("Failed to create package directory for local index")?;
    let mut cmd = Command::new(&config.program);
    cmd
      .arg("-p")
      .arg(config.port.to_string())
      .args(["-P", ".", "-a", ".", "-o", "-v"])
      .arg(packages.path());

    Self::from_command(
      cmd,
      packages,
      config.url(),
      Duration::from_secs(config.timeout_secs),
      config.max_lines,
    )
  }

  /// Spawn `cmd` and wait until its stderr reports readiness
  pub(crate) fn from_command(
    mut cmd: Command,
    packages: TempDir,
    url: String,
    timeout: Duration,
    max_lines: usize,
  ) -> ReleaseResult<Self> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    info!("> {} (local index at {})", program, url);

    cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::piped());
    let mut child = cmd.spawn().map_err(|e| {
      ReleaseError::Process(ProcessError::SpawnFailed {
        command: program.clone(),
        reason: e.to_string(),
      })
    })?;

    let Some(stderr) = child.stderr.take() else {
      let _ = child.kill();
      let _ = child.wait();
      return Err(ReleaseError::message(format!("stderr missing for {}", program)));
    };

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
      let mut forward = true;
      for line in BufReader::new(stderr).lines() {
        let Ok(line) = line else { break };
        if forward {
          forward = tx.send(line).is_ok();
        } else {
          debug!("index: {}", line.trim());
        }
      }
    });

    // From here on, any early return drops the guard and kills the child
    let index = Self { child, packages, url };
    wait_for_marker(&rx, timeout, max_lines)?;
    info!("Local index ready at {}", index.url);
    Ok(index)
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  pub fn packages_dir(&self) -> &Path {
    self.packages.path()
  }
}

impl fmt::Debug for LocalIndex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LocalIndex")
      .field("url", &self.url)
      .field("packages", &self.packages.path())
      .field("pid", &self.child.id())
      .finish()
  }
}

impl Drop for LocalIndex {
  fn drop(&mut self) {
    let _ = self.child.kill();
    let _ = self.child.wait();
  }
}

fn wait_for_marker(rx: &Receiver<String>, timeout: Duration, max_lines: usize) -> ReleaseResult<()> {
  let deadline = Instant::now() + timeout;
  let mut seen = 0usize;

  loop {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
      return Err(not_ready(format!("no \"{}\" within {:?}", READY_MARKER, timeout)));
    }

    match rx.recv_timeout(remaining) {
      Ok(line) => {
        info!("{}", line.trim());
        if line.contains(READY_MARKER) {
          return Ok(());
        }
        seen += 1;
        if seen >= max_lines {
          return Err(not_ready(format!("no \"{}\" in the first {} lines", READY_MARKER, max_lines)));
        }
      }
      Err(RecvTimeoutError::Timeout) => {
        return Err(not_ready(format!("no \"{}\" within {:?}", READY_MARKER, timeout)));
      }
      Err(RecvTimeoutError::Disconnected) => {
        return Err(not_ready("server exited before it was ready".to_string()));
      }
    }
  }
}

fn not_ready(reason: String) -> ReleaseError {
  DistError::IndexNotReady { reason }.into()
}
