//! CLI commands for release-rail
//!
//! ## Python distributions
//! - **build**: build sdist + wheel into the dist directory
//! - **check**: metadata check and isolated install test per artifact
//! - **publish**: upload artifacts with twine (optionally to a local index)
//!
//! ## Credentials
//! - **token**: report whether a PyPI token resolves for a release
//!
//! ## CI actions
//! - **action**: draft-changelog, draft-release, publish-release
//!
//! All commands accept `&ReleaseContext` so configuration is loaded once.

pub mod action;
pub mod build;
pub mod check;
pub mod publish;
pub mod token;

pub use action::{ActionKind, run_action};
pub use build::run_build_python;
pub use check::run_check_python;
pub use publish::run_publish_python;
pub use token::run_resolve_token;
