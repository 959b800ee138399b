//! `resolve-token` command
//!
//! Reports whether a PyPI token is available for the release. The value is
//! only ever written to `--env-file` (e.g. `$GITHUB_ENV`), never to stdout.

use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::python::token::repo_name_from_url;
use crate::python::{TokenSource, resolve_token_with_source};
use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub fn run_resolve_token(
  ctx: &ReleaseContext,
  release_url: Option<String>,
  env_file: Option<PathBuf>,
  json: bool,
) -> ReleaseResult<()> {
  let release_url = release_url.or_else(|| ctx.config.publish.release_url.clone());
  let (credential, source) = resolve_token_with_source(&ctx.config.tokens, release_url.as_deref());
  let repository = release_url.as_deref().and_then(repo_name_from_url);

  if let Some(path) = &env_file
    && !credential.is_empty()
  {
    let path = ctx.resolve(path);
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&path)
      .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "TWINE_PASSWORD={}", credential.expose()).with_context(|| format!("Failed to write {}", path.display()))?;
  }

  let source_label = match source {
    TokenSource::Map => "PYPI_TOKEN_MAP",
    TokenSource::Direct => "PYPI_TOKEN",
    TokenSource::None => "none",
  };

  if json {
    let report = json!({
      "found": !credential.is_empty(),
      "source": source_label,
      "repository": repository,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else if credential.is_empty() {
    println!("⚠️  No PyPI token found");
  } else {
    println!("🔑 PyPI token found (from {})", source_label);
  }

  Ok(())
}
