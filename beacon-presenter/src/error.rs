//! Error types for beacon-presenter.

use thiserror::Error;

use beacon_core::NotificationId;

/// Failure reported by a presentation backend.
///
/// Beacon never retries: the error is either logged (persistent indicator)
/// or handed back to the caller (transient alerts).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend refused a single operation.
    #[error("presentation backend rejected {operation}: {reason}")]
    Rejected { operation: String, reason: String },
}

impl BackendError {
    pub fn rejected(operation: &str, id: Option<NotificationId>, reason: impl Into<String>) -> Self {
        let operation = match id {
            Some(id) => format!("{operation} {id}"),
            None => operation.to_string(),
        };
        BackendError::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}
