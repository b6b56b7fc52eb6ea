//! Beacon core library: domain types, content descriptors, preferences.
//!
//! Public API surface:
//! - [`types`]: service state, notification identity, platform flags
//! - [`content`]: semantic descriptors the policy emits instead of strings
//! - [`error`]: [`PreferenceError`]
//! - [`prefs`]: preference store boundary, typed snapshot, YAML persistence

pub mod content;
pub mod error;
pub mod prefs;
pub mod types;

pub use content::{Content, FallbackText, PersistentContent};
pub use error::PreferenceError;
pub use prefs::{PrefValue, PreferenceMap, PreferenceStore, Preferences};
pub use types::{
    Category, LinkTarget, NotificationId, NotificationType, PlatformCapabilities, Priority,
    ServiceState,
};
