//! Publishing metadata to an external reporting surface (dashboard,
//! telemetry table, console).

use std::collections::BTreeMap;

use crate::build_info::BuildInfo;

pub const BRANCH_KEY: &str = "Branch: ";
pub const COMMIT_KEY: &str = "Commit: ";
pub const PROGRAM_KEY: &str = "Program: ";
/// Carries [`lt_core::LIBRARY_VERSION`].
pub const LIBRARY_KEY: &str = "Library: ";
pub const TIME_KEY: &str = "Time: ";
pub const USER_KEY: &str = "User: ";

/// Receives read-only string properties.
pub trait PropertySink {
    fn add_string_property(&mut self, key: &str, value: &str);
}

impl PropertySink for Vec<(String, String)> {
    fn add_string_property(&mut self, key: &str, value: &str) {
        self.push((key.to_string(), value.to_string()));
    }
}

impl PropertySink for BTreeMap<String, String> {
    fn add_string_property(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }
}

/// Something a reporting surface can display under a name.
pub trait Reportable {
    fn name(&self) -> &str;

    fn subsystem(&self) -> &str;

    fn publish(&self, sink: &mut dyn PropertySink);
}

impl Reportable for BuildInfo {
    fn name(&self) -> &str {
        &self.name
    }

    fn subsystem(&self) -> &str {
        &self.subsystem
    }

    fn publish(&self, sink: &mut dyn PropertySink) {
        sink.add_string_property(BRANCH_KEY, self.branch());
        sink.add_string_property(COMMIT_KEY, self.commit());
        sink.add_string_property(PROGRAM_KEY, self.program_version());
        sink.add_string_property(LIBRARY_KEY, self.library_version());
        sink.add_string_property(TIME_KEY, self.time());
        sink.add_string_property(USER_KEY, self.user());
    }
}
