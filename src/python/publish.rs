//! Uploading artifacts with twine

use crate::core::context::ReleaseContext;
use crate::core::error::{DistError, ReleaseResult};
use crate::core::process::CommandSpec;
use crate::python::artifact::Artifact;
use crate::python::index::LocalIndex;
use crate::python::token::{repo_name_from_url, resolve_token};
use tracing::info;

/// Password handed to twine for the local index, which runs without auth
const LOCAL_INDEX_PASSWORD: &str = "local-index";

/// Upload every artifact; returns how many were uploaded
///
/// The credential reaches twine only through `TWINE_PASSWORD` in the child
/// environment. Publishing to `index` does not require a credential.
pub fn publish_dist(ctx: &ReleaseContext, artifacts: &[Artifact], index: Option<&LocalIndex>) -> ReleaseResult<usize> {
  let release_url = ctx.config.publish.release_url.as_deref();
  let credential = resolve_token(&ctx.config.tokens, release_url);

  let password = match index {
    Some(_) if credential.is_empty() => LOCAL_INDEX_PASSWORD.to_string(),
    _ if credential.is_empty() => {
      return Err(
        DistError::MissingCredential {
          repository: release_url.and_then(repo_name_from_url),
        }
        .into(),
      );
    }
    _ => credential.expose().to_string(),
  };

  let repository_url = index
    .map(|i| i.url().to_string())
    .or_else(|| ctx.config.publish.repository_url.clone());

  for artifact in artifacts {
    let mut spec = CommandSpec::new(&ctx.config.tools.twine).arg("upload");
    if let Some(url) = &repository_url {
      spec = spec.arg(format!("--repository-url={}", url));
    }
    let spec = spec
      .path_arg(&artifact.path)
      .env("TWINE_USERNAME", ctx.config.publish.twine_username.as_str())
      .env("TWINE_PASSWORD", password.as_str())
      .current_dir(&ctx.root)
      .quiet(!ctx.verbose);
    ctx.runner.run(&spec)?;
    info!("Uploaded {} {} ({})", artifact.name, artifact.version, artifact.kind);
  }

  Ok(artifacts.len())
}
