//! Python packaging: build, check, credential resolution, publish
//!
//! # Flow
//!
//! ```text
//! build_dist(dist_dir)        -> sdist + wheel in dist_dir
//!   check_dist(artifact)      -> twine check + isolated install + smoke test
//! resolve_token(release_url)  -> credential from PYPI_TOKEN / PYPI_TOKEN_MAP
//!   publish_dist(artifacts)   -> twine upload
//! ```
//!
//! Every external tool runs through the context's `CommandRunner`.

pub mod artifact;
pub mod build;
pub mod check;
pub mod index;
pub mod publish;
pub mod token;

pub use artifact::{Artifact, list_artifacts};
pub use build::build_dist;
pub use check::check_all;
pub use index::LocalIndex;
pub use publish::publish_dist;
pub use token::{TokenSource, resolve_token_with_source};
