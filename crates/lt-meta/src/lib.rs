//! Build and version metadata for programs built on looptrace.
//!
//! [`BuildInfo`] carries six strings (branch, commit, program version,
//! library version, build time, build user). Every field reads `"unknown"`
//! until [`BuildInfo::init`] fills in the program version, the library
//! version, and whatever a packaged build manifest provides.
//!
//! A program normally builds one instance at startup and installs it with
//! [`global::install`]; readers use [`global::get`].

pub mod build_info;
pub mod error;
pub mod global;
pub mod manifest;
pub mod publish;

pub use build_info::{BuildInfo, MANIFEST_ENV_VAR, MANIFEST_FILE_NAME, UNKNOWN};
pub use error::{MetaError, MetaResult};
pub use manifest::Manifest;
pub use publish::{PropertySink, Reportable};
