//! Preference file error-message, defaulting and persistence integration tests.
//! Storage: ~/.beacon/preferences.yaml

use assert_fs::prelude::*;
use beacon_core::{
    prefs::{self, KEY_ALWAYS_RUN_IN_BACKGROUND, KEY_FOREGROUND_SERVICE, KEY_NOTIFICATION_TYPE},
    NotificationType, PrefValue, PreferenceError, PreferenceMap, Preferences,
};
use predicates::prelude::predicate;
use rstest::rstest;

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".beacon/preferences.yaml")
        .write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = prefs::load_at(home.path()).unwrap_err();
    assert!(matches!(err, PreferenceError::Parse { .. }), "got: {err}");
    assert!(
        err.to_string().contains("preferences.yaml"),
        "must contain file path, got: {err}"
    );
}

#[test]
fn load_list_instead_of_map_returns_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".beacon/preferences.yaml")
        .write_str("- this is a list, not a mapping\n")
        .expect("write");

    let err = prefs::load_at(home.path()).unwrap_err();
    assert!(matches!(err, PreferenceError::Parse { .. }), "got: {err}");
}

#[test]
fn load_empty_file_is_empty_map() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".beacon/preferences.yaml").touch().expect("touch");
    assert_eq!(prefs::load_at(home.path()).expect("load"), PreferenceMap::new());
}

// ---------------------------------------------------------------------------
// 2. Hand-written files
// ---------------------------------------------------------------------------

#[test]
fn hand_written_yaml_is_read_as_typed_snapshot() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".beacon/preferences.yaml")
        .write_str(
            "notification_type: none\nforeground_service: true\nalways_run_in_background: false\n",
        )
        .expect("write");

    let map = prefs::load_at(home.path()).expect("load");
    let snapshot = Preferences::read(&map);
    assert_eq!(snapshot.notification_type, NotificationType::None);
    assert!(snapshot.foreground_service);
    assert!(!snapshot.always_run_in_background);
    assert!(!snapshot.notify_crashes, "absent key keeps default");
}

#[rstest]
#[case("none", NotificationType::None)]
#[case("default", NotificationType::Default)]
#[case("low_priority", NotificationType::LowPriority)]
#[case("LOW_PRIORITY", NotificationType::LowPriority)]
#[case("", NotificationType::LowPriority)]
#[case("silent", NotificationType::LowPriority)]
fn notification_type_values(#[case] raw: &str, #[case] expected: NotificationType) {
    let map = PreferenceMap::new().with(KEY_NOTIFICATION_TYPE, PrefValue::Text(raw.to_string()));
    assert_eq!(Preferences::read(&map).notification_type, expected, "raw: {raw:?}");
}

#[rstest]
#[case("notification_type: 2\n")]
#[case("notification_type: ~\n")]
#[case("notification_type:\n")]
#[case("notification_type: [low_priority]\n")]
fn odd_notification_type_values_load_and_keep_other_keys(#[case] line: &str) {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".beacon/preferences.yaml")
        .write_str(&format!("always_run_in_background: true\n{line}"))
        .expect("write");

    let map = prefs::load_at(home.path()).expect("well-formed mapping must load");
    assert!(matches!(
        map.0.get(KEY_NOTIFICATION_TYPE),
        Some(PrefValue::Other(_))
    ));

    let snapshot = Preferences::read(&map);
    assert_eq!(snapshot.notification_type, NotificationType::LowPriority);
    assert!(snapshot.always_run_in_background);
}

#[test]
fn numeric_bool_value_reads_as_default() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".beacon/preferences.yaml")
        .write_str("notify_crashes: 1\nforeground_service: true\n")
        .expect("write");

    let snapshot = Preferences::read(&prefs::load_at(home.path()).expect("load"));
    assert!(!snapshot.notify_crashes);
    assert!(snapshot.foreground_service);
}

// ---------------------------------------------------------------------------
// 3. Save
// ---------------------------------------------------------------------------

#[test]
fn save_writes_readable_yaml() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let mut map = PreferenceMap::defaults();
    map.set_from_str(KEY_ALWAYS_RUN_IN_BACKGROUND, "true").expect("set");
    prefs::save_at(home.path(), &map).expect("save");

    home.child(".beacon/preferences.yaml")
        .assert(predicate::str::contains("always_run_in_background: true"));
    home.child(".beacon/preferences.yaml")
        .assert(predicate::str::contains("notification_type: low_priority"));
}

#[test]
fn save_overwrites_previous_values() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let first = PreferenceMap::new().with(KEY_FOREGROUND_SERVICE, PrefValue::Bool(true));
    prefs::save_at(home.path(), &first).expect("save first");
    let second = PreferenceMap::new().with(KEY_FOREGROUND_SERVICE, PrefValue::Bool(false));
    prefs::save_at(home.path(), &second).expect("save second");

    let loaded = prefs::load_at(home.path()).expect("load");
    assert!(!Preferences::read(&loaded).foreground_service);
}
