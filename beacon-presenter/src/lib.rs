//! # beacon-presenter
//!
//! Status-to-presentation policy for a background sync service.
//!
//! [`StatusPresenter::reconcile`] decides the persistent "running" indicator
//! from the service state, user preferences and platform capabilities, and
//! applies it idempotently to a [`PresentationBackend`]. The `show_*` methods
//! dispatch one-shot alerts.

pub mod alerts;
pub mod backend;
pub mod error;
pub mod platform;
pub mod policy;
pub mod presentation;
pub mod presenter;

pub use backend::{BackendCall, DisplayedNotification, PresentationBackend, RecordingBackend};
pub use error::BackendError;
pub use platform::{ApiLevelProbe, CapabilityProbe};
pub use policy::{decide, Decision, Indicator, NotificationPolicy, PersistentCommand};
pub use presentation::{NotificationSpec, Presentation};
pub use presenter::StatusPresenter;
