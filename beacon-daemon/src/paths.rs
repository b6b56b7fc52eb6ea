use std::path::{Path, PathBuf};
use std::time::Duration;

use beacon_core::prefs;

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

pub const DAEMON_SOCKET: &str = "daemon.sock";
pub const TEMPLATES_DIR: &str = "templates";

pub fn beacon_root(home: &Path) -> PathBuf {
    prefs::beacon_dir_at(home)
}

pub fn socket_path(home: &Path) -> PathBuf {
    beacon_root(home).join(DAEMON_SOCKET)
}

pub fn preferences_path(home: &Path) -> PathBuf {
    prefs::path_at(home)
}

/// User template overrides, `<home>/.beacon/templates/<key>/{title,body}.tera`.
pub fn templates_dir(home: &Path) -> PathBuf {
    beacon_root(home).join(TEMPLATES_DIR)
}
