//! Build manifest parsing.
//!
//! The manifest is a text file of `Key: Value` lines written by the build.
//! A line starting with a single space continues the previous value. Only the
//! main section is read: parsing stops at the first blank line. Attribute
//! names compare ASCII case-insensitively, and a repeated name replaces the
//! earlier value.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{MetaError, MetaResult};

/// Main-section attributes of a build manifest, keyed by lower-cased name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    attributes: BTreeMap<String, String>,
}

impl Manifest {
    /// Parse manifest text.
    pub fn parse(text: &str) -> MetaResult<Self> {
        let mut attributes: BTreeMap<String, String> = BTreeMap::new();
        let mut last_key: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if line.is_empty() {
                break;
            }

            if let Some(rest) = line.strip_prefix(' ') {
                let key = last_key.as_ref().ok_or_else(|| MetaError::ManifestMalformed {
                    line: line_no,
                    what: "continuation line without a preceding attribute".to_string(),
                })?;
                if let Some(value) = attributes.get_mut(key) {
                    value.push_str(rest);
                }
                continue;
            }

            let (key, value) = line
                .split_once(": ")
                .or_else(|| line.strip_suffix(':').map(|k| (k, "")))
                .ok_or_else(|| MetaError::ManifestMalformed {
                    line: line_no,
                    what: format!("expected `Key: Value`, found `{line}`"),
                })?;

            if key.is_empty() || key.contains(char::is_whitespace) {
                return Err(MetaError::ManifestMalformed {
                    line: line_no,
                    what: format!("invalid attribute name `{key}`"),
                });
            }

            let key = key.to_ascii_lowercase();
            attributes.insert(key.clone(), value.to_string());
            last_key = Some(key);
        }

        Ok(Self { attributes })
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> MetaResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| MetaError::ManifestUnavailable {
            path: path.display().to_string(),
            what: match e.kind() {
                io::ErrorKind::NotFound => "not found".to_string(),
                _ => e.to_string(),
            },
        })?;
        Self::parse(&text)
    }

    /// Attribute value, if present. `key` is matched ignoring ASCII case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Manifest-Version: 1.0\r\n\
Time: 2024-03-02 18:44:10\r\n\
User: builder\r\n\
Branch: feature/lift-\r\n tuning\r\n\
Commit: 9f3c2ab\r\n\
\r\n\
Name: ignored/section\r\n\
Branch: other\r\n";

    #[test]
    fn parses_main_section() {
        let manifest = Manifest::parse(SAMPLE).unwrap();
        assert_eq!(manifest.get("Time"), Some("2024-03-02 18:44:10"));
        assert_eq!(manifest.get("User"), Some("builder"));
        assert_eq!(manifest.get("Commit"), Some("9f3c2ab"));
        assert_eq!(manifest.len(), 5);
    }

    #[test]
    fn continuation_lines_are_joined() {
        let manifest = Manifest::parse(SAMPLE).unwrap();
        assert_eq!(manifest.get("Branch"), Some("feature/lift-tuning"));
    }

    #[test]
    fn attribute_names_ignore_case() {
        let manifest = Manifest::parse("time: 12:00\nCOMMIT: abc\nuSeR: ci\n -bot\n").unwrap();
        assert_eq!(manifest.get("Time"), Some("12:00"));
        assert_eq!(manifest.get("Commit"), Some("abc"));
        assert_eq!(manifest.get("user"), Some("ci-bot"));
        assert_eq!(manifest.get("USER"), Some("ci-bot"));
    }

    #[test]
    fn repeated_name_in_other_case_replaces_value() {
        let manifest = Manifest::parse("Branch: main\nbranch: dev\n").unwrap();
        assert_eq!(manifest.get("Branch"), Some("dev"));
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn missing_attribute_is_none() {
        let manifest = Manifest::parse("Time: now\n").unwrap();
        assert!(manifest.get("User").is_none());
    }

    #[test]
    fn empty_value_is_allowed() {
        let manifest = Manifest::parse("Branch:\n").unwrap();
        assert_eq!(manifest.get("Branch"), Some(""));
    }

    #[test]
    fn line_without_separator_is_malformed() {
        let err = Manifest::parse("Time: now\ngarbage\n").unwrap_err();
        assert!(matches!(err, MetaError::ManifestMalformed { line: 2, .. }));
    }

    #[test]
    fn leading_continuation_is_malformed() {
        let err = Manifest::parse(" dangling\n").unwrap_err();
        assert!(matches!(err, MetaError::ManifestMalformed { line: 1, .. }));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let path = std::env::temp_dir().join("lt_meta_no_such_manifest.MF");
        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(err, MetaError::ManifestUnavailable { .. }));
    }
}
