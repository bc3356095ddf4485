//! The process-wide build info instance.
//!
//! Install once at startup, before anything reads it. It cannot change after.

use std::sync::OnceLock;

use crate::build_info::BuildInfo;
use crate::error::{MetaError, MetaResult};

static BUILD_INFO: OnceLock<BuildInfo> = OnceLock::new();

/// Install the process-wide instance. Fails if one is installed already.
pub fn install(info: BuildInfo) -> MetaResult<&'static BuildInfo> {
    BUILD_INFO
        .set(info)
        .map_err(|_| MetaError::AlreadyInstalled)?;
    BUILD_INFO.get().ok_or(MetaError::AlreadyInstalled)
}

/// The installed instance, if any.
pub fn get() -> Option<&'static BuildInfo> {
    BUILD_INFO.get()
}
