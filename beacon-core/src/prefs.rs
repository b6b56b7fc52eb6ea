//! Preference store boundary and YAML-backed persistence.
//!
//! # Storage layout
//!
//! ```text
//! ~/.beacon/
//!   preferences.yaml   (flat key → value map: mode 0600)
//! ```
//!
//! # API pattern
//!
//! Every file-touching function has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Reads never fail on *values*: a missing, mistyped or unrecognised entry
//! resolves to its default so that a visible indicator survives bad input.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;
use crate::types::NotificationType;

pub const KEY_NOTIFICATION_TYPE: &str = "notification_type";
pub const KEY_FOREGROUND_SERVICE: &str = "foreground_service";
pub const KEY_ALWAYS_RUN_IN_BACKGROUND: &str = "always_run_in_background";
pub const KEY_NOTIFY_CRASHES: &str = "notify_crashes";

/// Every key Beacon reads.
pub const KNOWN_KEYS: &[&str] = &[
    KEY_NOTIFICATION_TYPE,
    KEY_FOREGROUND_SERVICE,
    KEY_ALWAYS_RUN_IN_BACKGROUND,
    KEY_NOTIFY_CRASHES,
];

pub const PREFERENCES_FILE: &str = "preferences.yaml";

// ---------------------------------------------------------------------------
// 1. Store boundary
// ---------------------------------------------------------------------------

/// Read-only key-value view of user preferences, polled at decision time.
pub trait PreferenceStore {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_bool(&self, key: &str) -> Option<bool>;
}

/// A single stored value.
///
/// Anything that is neither a boolean nor a string (numbers, nulls, nested
/// YAML) lands in `Other` and reads as unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Text(String),
    Other(serde_yaml::Value),
}

impl std::fmt::Display for PrefValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefValue::Bool(b) => b.fmt(f),
            PrefValue::Text(s) => s.fmt(f),
            PrefValue::Other(serde_yaml::Value::Null) => f.write_str("~"),
            PrefValue::Other(serde_yaml::Value::Number(n)) => n.fmt(f),
            PrefValue::Other(other) => write!(f, "{other:?}"),
        }
    }
}

/// Flat preference map, the on-disk shape of `preferences.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PreferenceMap(pub BTreeMap<String, PrefValue>);

impl PreferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding every known key at its default value.
    pub fn defaults() -> Self {
        Self::from(&Preferences::default())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PrefValue) {
        self.0.insert(key.into(), value);
    }

    pub fn with(mut self, key: &str, value: PrefValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a known key from raw CLI text. `true`/`false` become booleans,
    /// anything else is stored as a string.
    pub fn set_from_str(&mut self, key: &str, raw: &str) -> Result<(), PreferenceError> {
        if !KNOWN_KEYS.contains(&key) {
            return Err(PreferenceError::UnknownKey {
                key: key.to_string(),
                expected: KNOWN_KEYS.join(", "),
            });
        }
        let value = match raw.trim() {
            "true" => PrefValue::Bool(true),
            "false" => PrefValue::Bool(false),
            other => PrefValue::Text(other.to_string()),
        };
        self.insert(key, value);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PrefValue)> {
        self.0.iter()
    }
}

impl PreferenceStore for PreferenceMap {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            PrefValue::Text(s) => Some(s.clone()),
            PrefValue::Bool(_) | PrefValue::Other(_) => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            PrefValue::Bool(b) => Some(*b),
            PrefValue::Text(_) | PrefValue::Other(_) => None,
        }
    }
}

impl From<&Preferences> for PreferenceMap {
    fn from(p: &Preferences) -> Self {
        PreferenceMap::new()
            .with(
                KEY_NOTIFICATION_TYPE,
                PrefValue::Text(p.notification_type.as_str().to_string()),
            )
            .with(KEY_FOREGROUND_SERVICE, PrefValue::Bool(p.foreground_service))
            .with(
                KEY_ALWAYS_RUN_IN_BACKGROUND,
                PrefValue::Bool(p.always_run_in_background),
            )
            .with(KEY_NOTIFY_CRASHES, PrefValue::Bool(p.notify_crashes))
    }
}

// ---------------------------------------------------------------------------
// 2. Typed snapshot
// ---------------------------------------------------------------------------

/// Preferences as the policy consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Preferences {
    pub notification_type: NotificationType,
    pub foreground_service: bool,
    pub always_run_in_background: bool,
    pub notify_crashes: bool,
}

impl Preferences {
    /// Read a snapshot, substituting defaults for missing or unusable values.
    pub fn read(store: &dyn PreferenceStore) -> Self {
        let defaults = Preferences::default();
        Preferences {
            notification_type: store
                .get_string(KEY_NOTIFICATION_TYPE)
                .and_then(|raw| NotificationType::parse(&raw))
                .unwrap_or(defaults.notification_type),
            foreground_service: store
                .get_bool(KEY_FOREGROUND_SERVICE)
                .unwrap_or(defaults.foreground_service),
            always_run_in_background: store
                .get_bool(KEY_ALWAYS_RUN_IN_BACKGROUND)
                .unwrap_or(defaults.always_run_in_background),
            notify_crashes: store
                .get_bool(KEY_NOTIFY_CRASHES)
                .unwrap_or(defaults.notify_crashes),
        }
    }

    /// Stored `notification_type` text that did not parse, if any.
    pub fn unrecognized_notification_type(store: &dyn PreferenceStore) -> Option<String> {
        store
            .get_string(KEY_NOTIFICATION_TYPE)
            .filter(|raw| NotificationType::parse(raw).is_none())
    }
}

// ---------------------------------------------------------------------------
// 3. Paths
// ---------------------------------------------------------------------------

/// `<home>/.beacon/`
pub fn beacon_dir_at(home: &Path) -> PathBuf {
    home.join(".beacon")
}

/// `<home>/.beacon/preferences.yaml`: pure, no I/O.
pub fn path_at(home: &Path) -> PathBuf {
    beacon_dir_at(home).join(PREFERENCES_FILE)
}

/// `path_at` convenience wrapper.
pub fn path() -> Result<PathBuf, PreferenceError> {
    Ok(path_at(&home()?))
}

// ---------------------------------------------------------------------------
// 4. Load / save
// ---------------------------------------------------------------------------

/// Load `<home>/.beacon/preferences.yaml`.
///
/// A missing or empty file is an empty map, not an error. Malformed YAML, or
/// a document that is not a mapping, returns `PreferenceError::Parse` with
/// the file path. Odd values inside a well-formed mapping load as
/// [`PrefValue::Other`].
pub fn load_at(home: &Path) -> Result<PreferenceMap, PreferenceError> {
    let path = path_at(home);
    if !path.exists() {
        return Ok(PreferenceMap::new());
    }
    let contents = std::fs::read_to_string(&path)?;
    if contents.trim().is_empty() {
        return Ok(PreferenceMap::new());
    }
    serde_yaml::from_str(&contents).map_err(|e| PreferenceError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<PreferenceMap, PreferenceError> {
    load_at(&home()?)
}

/// Atomically save the map to `<home>/.beacon/preferences.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, prefs: &PreferenceMap) -> Result<(), PreferenceError> {
    let dir = beacon_dir_at(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    let path = path_at(home);
    let tmp_path = path.with_file_name(format!("{PREFERENCES_FILE}.tmp"));

    let yaml = serde_yaml::to_string(prefs)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(prefs: &PreferenceMap) -> Result<(), PreferenceError> {
    save_at(&home()?, prefs)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, PreferenceError> {
    dirs::home_dir().ok_or(PreferenceError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), PreferenceError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), PreferenceError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), PreferenceError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), PreferenceError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_home() -> TempDir {
        TempDir::new().expect("tempdir")
    }

    #[test]
    fn preferences_path_is_correct() {
        let home = make_home();
        assert!(path_at(home.path()).ends_with(".beacon/preferences.yaml"));
    }

    #[test]
    fn empty_store_reads_defaults() {
        let prefs = Preferences::read(&PreferenceMap::new());
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.notification_type, NotificationType::LowPriority);
        assert!(!prefs.foreground_service);
        assert!(!prefs.always_run_in_background);
        assert!(!prefs.notify_crashes);
    }

    #[test]
    fn unknown_notification_type_falls_back_to_low_priority() {
        let map = PreferenceMap::new().with(KEY_NOTIFICATION_TYPE, PrefValue::Text("loud".into()));
        let prefs = Preferences::read(&map);
        assert_eq!(prefs.notification_type, NotificationType::LowPriority);
        assert_eq!(
            Preferences::unrecognized_notification_type(&map).as_deref(),
            Some("loud")
        );
    }

    #[test]
    fn mistyped_bool_falls_back_to_default() {
        let map = PreferenceMap::new().with(KEY_NOTIFY_CRASHES, PrefValue::Text("yes".into()));
        assert!(!Preferences::read(&map).notify_crashes);
    }

    #[test]
    fn set_from_str_parses_booleans() {
        let mut map = PreferenceMap::new();
        map.set_from_str(KEY_FOREGROUND_SERVICE, "true").expect("set");
        map.set_from_str(KEY_NOTIFICATION_TYPE, "default").expect("set");
        assert_eq!(map.get_bool(KEY_FOREGROUND_SERVICE), Some(true));
        assert_eq!(map.get_string(KEY_NOTIFICATION_TYPE).as_deref(), Some("default"));
    }

    #[test]
    fn set_from_str_rejects_unknown_key() {
        let err = PreferenceMap::new()
            .set_from_str("vibrate", "true")
            .unwrap_err();
        assert!(matches!(err, PreferenceError::UnknownKey { .. }));
        assert!(err.to_string().contains("notification_type"));
    }

    #[test]
    fn load_missing_file_is_empty() {
        let home = make_home();
        let map = load_at(home.path()).expect("load");
        assert_eq!(map, PreferenceMap::new());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let home = make_home();
        let map = PreferenceMap::defaults().with(KEY_NOTIFY_CRASHES, PrefValue::Bool(true));
        save_at(home.path(), &map).expect("save");
        let loaded = load_at(home.path()).expect("load");
        assert_eq!(loaded, map);
        assert!(Preferences::read(&loaded).notify_crashes);
    }

    #[test]
    fn atomic_write_cleans_up_tmp() {
        let home = make_home();
        save_at(home.path(), &PreferenceMap::defaults()).expect("save");
        let tmp = path_at(home.path()).with_file_name("preferences.yaml.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after successful save");
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let home = make_home();
        save_at(home.path(), &PreferenceMap::defaults()).expect("save");
        let mode = std::fs::metadata(path_at(home.path()))
            .expect("metadata")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(PreferenceError::HomeNotFound.to_string().contains("home directory"));
    }
}
