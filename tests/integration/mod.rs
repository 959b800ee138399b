//! Integration tests for release-rail
//!
//! These run the compiled binary against scratch projects. Python tooling is
//! replaced with small shell scripts configured through release.toml, so the
//! suite does not need python, twine or pypi-server installed.

mod helpers;
mod test_action;
mod test_build;
mod test_check;
mod test_publish;
mod test_token;
