//! Core engine for release-rail operations
//!
//! - **config**: release.toml + environment loading into an explicit struct
//! - **context**: root, config and runner shared by every command
//! - **error**: error types with contextual help messages and exit codes
//! - **process**: external command execution behind the `CommandRunner` seam

pub mod config;
pub mod context;
pub mod error;
pub mod process;
