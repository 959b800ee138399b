mod actions;
mod commands;
mod core;
mod python;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use core::error::{ReleaseError, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Build, check, and publish Python release artifacts from CI
#[derive(Parser)]
#[command(name = "release-rail")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Stream tool output and log more (-vv for trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Python distributions
  // ============================================================================
  /// Build sdist and wheel into the dist directory
  BuildPython {
    /// Output directory (default: python.dist_dir, or RH_DIST_DIR)
    #[arg(long)]
    dist_dir: Option<PathBuf>,
    /// Output built artifacts in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Check built artifacts (twine check + isolated install + test command)
  CheckPython {
    /// Artifacts to check (default: every artifact in the dist directory)
    files: Vec<PathBuf>,
    /// Directory to scan when no files are given
    #[arg(long)]
    dist_dir: Option<PathBuf>,
    /// Command run inside the check environment (default: import the package)
    #[arg(long)]
    test_cmd: Option<String>,
    /// Check artifacts concurrently
    #[arg(long)]
    parallel: bool,
  },

  /// Upload artifacts with twine
  PublishPython {
    /// Artifacts to upload (default: every artifact in the dist directory)
    files: Vec<PathBuf>,
    /// Directory to scan when no files are given
    #[arg(long)]
    dist_dir: Option<PathBuf>,
    /// Upload to a temporary local pypi-server instead of the configured index
    #[arg(long)]
    local_index: bool,
    /// GitHub release URL used to pick a token from PYPI_TOKEN_MAP
    #[arg(long)]
    release_url: Option<String>,
  },

  // ============================================================================
  // Credentials
  // ============================================================================
  /// Report whether a PyPI token is available (never prints the token)
  ResolveToken {
    /// GitHub release URL used to pick a token from PYPI_TOKEN_MAP
    #[arg(long)]
    release_url: Option<String>,
    /// Append TWINE_PASSWORD=<token> to this file (e.g. $GITHUB_ENV)
    #[arg(long)]
    env_file: Option<PathBuf>,
    /// Output result in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // CI actions
  // ============================================================================
  /// Run a CI workflow entry point
  #[command(subcommand)]
  Action(ActionCommands),
}

#[derive(Subcommand)]
enum ActionCommands {
  /// Bump the version and draft a changelog entry
  DraftChangelog,
  /// Run the full pre-release pipeline and draft a GitHub release
  DraftRelease,
  /// Publish a drafted release
  PublishRelease {
    /// GitHub release URL (default: RH_RELEASE_URL or release_url)
    #[arg(long)]
    release_url: Option<String>,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr so JSON output on stdout stays parseable
fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => "info",
    1 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_env("RELEASE_RAIL_LOG").unwrap_or_else(|_| EnvFilter::new(format!("release_rail={level}")));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let workspace_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // Environment is read exactly once, here; everything below gets the context
  let mut ctx = match core::context::ReleaseContext::build(&workspace_root) {
    Ok(ctx) => ctx.with_verbose(cli.verbose > 0),
    Err(e) => handle_error(e),
  };

  let release_url_override = match &cli.command {
    Commands::PublishPython { release_url, .. }
    | Commands::ResolveToken { release_url, .. }
    | Commands::Action(ActionCommands::PublishRelease { release_url }) => release_url.clone(),
    _ => None,
  };
  if let Some(url) = release_url_override {
    let mut config = (*ctx.config).clone();
    config.publish.release_url = Some(url);
    ctx.config = std::sync::Arc::new(config);
  }

  let result = match cli.command {
    Commands::BuildPython { dist_dir, json } => commands::run_build_python(&ctx, dist_dir, json),
    Commands::CheckPython {
      files,
      dist_dir,
      test_cmd,
      parallel,
    } => commands::run_check_python(&ctx, files, dist_dir, test_cmd, parallel),
    Commands::PublishPython {
      files,
      dist_dir,
      local_index,
      ..
    } => commands::run_publish_python(&ctx, files, dist_dir, local_index),
    Commands::ResolveToken { env_file, json, .. } => commands::run_resolve_token(&ctx, None, env_file, json),
    Commands::Action(action) => {
      let kind = match action {
        ActionCommands::DraftChangelog => commands::ActionKind::DraftChangelog,
        ActionCommands::DraftRelease => commands::ActionKind::DraftRelease,
        ActionCommands::PublishRelease { .. } => commands::ActionKind::PublishRelease,
      };
      commands::run_action(&ctx, kind)
    }
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
