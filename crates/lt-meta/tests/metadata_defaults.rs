use lt_core::LIBRARY_VERSION;
use lt_meta::{BuildInfo, MANIFEST_ENV_VAR, Manifest, Reportable, UNKNOWN};

#[test]
fn fields_are_unknown_before_init() {
    let info = BuildInfo::new();
    let mut props: Vec<(String, String)> = Vec::new();
    info.publish(&mut props);

    assert_eq!(props.len(), 6);
    for (key, value) in props {
        assert_eq!(value, UNKNOWN, "{key}");
    }
}

#[test]
fn init_without_manifest_sets_only_versions() {
    // Test binaries are not packaged with a manifest.
    if std::env::var_os(MANIFEST_ENV_VAR).is_some() {
        return;
    }

    let mut info = BuildInfo::new();
    info.init("1.2.3");

    assert_eq!(info.program_version(), "1.2.3");
    assert_eq!(info.library_version(), LIBRARY_VERSION);
    assert_eq!(info.branch(), UNKNOWN);
    assert_eq!(info.commit(), UNKNOWN);
    assert_eq!(info.time(), UNKNOWN);
    assert_eq!(info.user(), UNKNOWN);
}

#[test]
fn serializes_for_reporting() {
    let mut info = BuildInfo::new();
    info.init_from("2.0.0", &std::env::temp_dir().join("lt_meta_missing.MF"));

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["program_version"], "2.0.0");
    assert_eq!(json["branch"], "unknown");
}

#[test]
fn manifest_keys_in_any_case_fill_fields() {
    let manifest = Manifest::parse("time: 2025-01-09\nuser: ci\nBRANCH: main\ncommit: 0a1b2c\n").unwrap();
    let mut info = BuildInfo::new();
    info.apply(&manifest);

    assert_eq!(info.time(), "2025-01-09");
    assert_eq!(info.user(), "ci");
    assert_eq!(info.branch(), "main");
    assert_eq!(info.commit(), "0a1b2c");
}
