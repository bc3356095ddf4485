//! Library release identification.

/// Release string of the looptrace libraries.
///
/// Bump `version` in `crates/lt-core/Cargo.toml` for each release.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
