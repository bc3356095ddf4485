//! The build metadata carrier.

use std::env;
use std::path::{Path, PathBuf};

use lt_core::LIBRARY_VERSION;
use serde::{Deserialize, Serialize};

use crate::error::MetaError;
use crate::manifest::Manifest;

/// Value of every field that has not been initialized.
pub const UNKNOWN: &str = "unknown";

/// File name of the build manifest packaged next to the executable.
pub const MANIFEST_FILE_NAME: &str = "BUILD-MANIFEST.MF";

/// Environment variable overriding the manifest location.
pub const MANIFEST_ENV_VAR: &str = "LT_BUILD_MANIFEST";

const DEFAULT_NAME: &str = "VersionInfo";

/// Version and build provenance of the running program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub(crate) name: String,
    pub(crate) subsystem: String,
    branch: String,
    commit: String,
    program_version: String,
    library_version: String,
    time: String,
    user: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            subsystem: DEFAULT_NAME.to_string(),
            branch: UNKNOWN.to_string(),
            commit: UNKNOWN.to_string(),
            program_version: UNKNOWN.to_string(),
            library_version: UNKNOWN.to_string(),
            time: UNKNOWN.to_string(),
            user: UNKNOWN.to_string(),
        }
    }
}

impl BuildInfo {
    /// All fields `"unknown"`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the program and library versions, then read the packaged
    /// manifest if there is one.
    ///
    /// The manifest is looked up at `$LT_BUILD_MANIFEST`, falling back to
    /// [`MANIFEST_FILE_NAME`] in the executable's directory. A missing or
    /// malformed manifest is logged and leaves the remaining fields as they were.
    pub fn init(&mut self, program_version: &str) {
        self.set_versions(program_version);
        match default_manifest_path() {
            Some(path) => self.load_manifest(&path),
            None => tracing::debug!("no build manifest location for this process"),
        }
    }

    /// Same as [`init`](Self::init) with an explicit manifest path.
    pub fn init_from(&mut self, program_version: &str, manifest: &Path) {
        self.set_versions(program_version);
        self.load_manifest(manifest);
    }

    /// Copy `Time`, `User`, `Branch` and `Commit` from a parsed manifest.
    /// Attributes the manifest lacks keep their current value.
    pub fn apply(&mut self, manifest: &Manifest) {
        let fields = [
            ("Time", &mut self.time),
            ("User", &mut self.user),
            ("Branch", &mut self.branch),
            ("Commit", &mut self.commit),
        ];
        for (key, field) in fields {
            if let Some(value) = manifest.get(key) {
                *field = value.to_string();
            }
        }
    }

    fn set_versions(&mut self, program_version: &str) {
        self.program_version = program_version.to_string();
        self.library_version = LIBRARY_VERSION.to_string();
    }

    fn load_manifest(&mut self, path: &Path) {
        match Manifest::load(path) {
            Ok(manifest) => self.apply(&manifest),
            Err(e @ MetaError::ManifestUnavailable { .. }) => {
                tracing::debug!("{e}");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring build manifest: {e}");
            }
        }
    }

    /// Git branch the program was built from.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Most recent git commit of the program's source.
    pub fn commit(&self) -> &str {
        &self.commit
    }

    pub fn program_version(&self) -> &str {
        &self.program_version
    }

    pub fn library_version(&self) -> &str {
        &self.library_version
    }

    /// When the program was built.
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Who built the program.
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_subsystem(&mut self, subsystem: impl Into<String>) {
        self.subsystem = subsystem.into();
    }
}

/// Where [`BuildInfo::init`] looks for the manifest.
pub fn default_manifest_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(MANIFEST_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    let exe = env::current_exe().ok()?;
    Some(exe.parent()?.join(MANIFEST_FILE_NAME))
}
