//! PyPI credential resolution
//!
//! A credential comes either from a single token or from a token map of
//! `owner/repo,token` lines keyed by the GitHub repository being released.
//! Token values are never logged; only whether one was found.

use crate::core::config::TokenConfig;
use std::fmt;
use tracing::info;

const GITHUB_PREFIX: &str = "https://github.com/";

/// A resolved publish credential
///
/// `Debug` and `Display` never show the value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// The raw secret, for handing to a child process environment
  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      write!(f, "Credential(<empty>)")
    } else {
      write!(f, "Credential(<redacted>)")
    }
  }
}

impl fmt::Display for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      write!(f, "<empty>")
    } else {
      write!(f, "<redacted>")
    }
  }
}

/// Where a resolved credential came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
  Map,
  Direct,
  None,
}

/// `owner/repo` from a GitHub URL, or `None` if it has fewer than two segments
pub fn repo_name_from_url(release_url: &str) -> Option<String> {
  let trimmed = release_url.strip_prefix(GITHUB_PREFIX).unwrap_or(release_url);
  let mut parts = trimmed.split('/');
  match (parts.next(), parts.next()) {
    (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => Some(format!("{}/{}", owner, repo)),
    _ => None,
  }
}

/// Parse token map text into ordered `(repository, token)` pairs
///
/// Literal `\n` sequences become line breaks first. Lines without a comma map
/// to an empty token.
pub fn parse_token_map(raw: &str) -> Vec<(String, String)> {
  raw
    .replace("\\n", "\n")
    .lines()
    .filter(|line| !line.trim().is_empty())
    .map(|line| match line.split_once(',') {
      Some((name, token)) => (name.to_string(), token.to_string()),
      None => (line.to_string(), String::new()),
    })
    .collect()
}

/// Resolve the PyPI token for a release
pub fn resolve_token(tokens: &TokenConfig, release_url: Option<&str>) -> Credential {
  resolve_token_with_source(tokens, release_url).0
}

/// Resolve the token and report which source supplied it
pub fn resolve_token_with_source(tokens: &TokenConfig, release_url: Option<&str>) -> (Credential, TokenSource) {
  let release_url = release_url.filter(|url| !url.is_empty());
  let repo_name = release_url.and_then(repo_name_from_url);
  let repo_label = repo_name.as_deref().unwrap_or("unknown repository");

  if !tokens.map.is_empty()
    && let Some(url) = release_url
  {
    info!("Looking for pypi token for {} in token map", repo_label);
    if let Some(repo) = repo_name.as_deref() {
      let found = parse_token_map(&tokens.map)
        .into_iter()
        .find(|(name, _)| name == repo)
        .map(|(_, token)| token);
      if let Some(token) = found {
        info!("Found pypi token");
        return (Credential::new(token), TokenSource::Map);
      }
    } else {
      info!("Could not determine repository from {}", url);
    }
    info!("No token map entry for {}", repo_label);
  }

  if !tokens.direct.is_empty() {
    info!("Using pypi token from PYPI_TOKEN for {}", repo_label);
    (Credential::new(tokens.direct.clone()), TokenSource::Direct)
  } else {
    info!("Pypi token not found for {}", repo_label);
    (Credential::default(), TokenSource::None)
  }
}
