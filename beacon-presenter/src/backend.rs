//! Presentation backend boundary and an in-memory implementation.
//!
//! Backend contract:
//! - posting an id that is already displayed updates it in place
//! - cancelling an id that is not displayed is a no-op
//! - demoting while not foreground is a no-op

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use beacon_core::NotificationId;

use crate::error::BackendError;
use crate::presentation::NotificationSpec;

/// The host presentation layer.
pub trait PresentationBackend {
    fn post(&mut self, id: NotificationId, spec: &NotificationSpec) -> Result<(), BackendError>;
    fn cancel(&mut self, id: NotificationId) -> Result<(), BackendError>;
    fn promote_foreground(
        &mut self,
        id: NotificationId,
        spec: &NotificationSpec,
    ) -> Result<(), BackendError>;
    fn demote_foreground(&mut self) -> Result<(), BackendError>;
}

// ---------------------------------------------------------------------------
// RecordingBackend
// ---------------------------------------------------------------------------

/// A notification currently on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedNotification {
    pub id: NotificationId,
    pub spec: NotificationSpec,
    pub posted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One call as received by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", content = "id", rename_all = "snake_case")]
pub enum BackendCall {
    Post(NotificationId),
    Cancel(NotificationId),
    PromoteForeground(NotificationId),
    DemoteForeground,
}

/// In-memory board that honours the backend contract and records every call.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    displayed: BTreeMap<NotificationId, DisplayedNotification>,
    foreground: Option<NotificationId>,
    calls: Vec<BackendCall>,
    reject_remaining: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `n` calls with [`BackendError::Rejected`].
    pub fn reject_next(&mut self, n: usize) {
        self.reject_remaining = n;
    }

    pub fn displayed(&self) -> impl Iterator<Item = &DisplayedNotification> {
        self.displayed.values()
    }

    pub fn get(&self, id: NotificationId) -> Option<&DisplayedNotification> {
        self.displayed.get(&id)
    }

    pub fn is_displayed(&self, id: NotificationId) -> bool {
        self.displayed.contains_key(&id)
    }

    pub fn foreground(&self) -> Option<NotificationId> {
        self.foreground
    }

    /// User-visible state: every displayed id with its spec, plus the
    /// foreground id. Timestamps are excluded.
    pub fn visible_state(&self) -> (Vec<(NotificationId, NotificationSpec)>, Option<NotificationId>) {
        let entries = self
            .displayed
            .values()
            .map(|d| (d.id, d.spec.clone()))
            .collect();
        (entries, self.foreground)
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<BackendCall> {
        std::mem::take(&mut self.calls)
    }

    /// Simulate the user swiping a notification away. Ongoing entries
    /// cannot be swiped; returns whether anything was removed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        match self.displayed.get(&id) {
            Some(shown) if !shown.spec.ongoing => {
                self.displayed.remove(&id);
                tracing::debug!("user dismissed {id}");
                true
            }
            _ => false,
        }
    }

    fn admit(&mut self, call: BackendCall) -> Result<(), BackendError> {
        if self.reject_remaining > 0 {
            self.reject_remaining -= 1;
            let (operation, id) = match &call {
                BackendCall::Post(id) => ("post", Some(*id)),
                BackendCall::Cancel(id) => ("cancel", Some(*id)),
                BackendCall::PromoteForeground(id) => ("promote_foreground", Some(*id)),
                BackendCall::DemoteForeground => ("demote_foreground", None),
            };
            self.calls.push(call);
            return Err(BackendError::rejected(operation, id, "rejected by test hook"));
        }
        self.calls.push(call);
        Ok(())
    }

    fn upsert(&mut self, id: NotificationId, spec: &NotificationSpec) {
        let now = Utc::now();
        self.displayed
            .entry(id)
            .and_modify(|d| {
                d.spec = spec.clone();
                d.updated_at = now;
            })
            .or_insert_with(|| DisplayedNotification {
                id,
                spec: spec.clone(),
                posted_at: now,
                updated_at: now,
            });
    }
}

impl PresentationBackend for RecordingBackend {
    fn post(&mut self, id: NotificationId, spec: &NotificationSpec) -> Result<(), BackendError> {
        self.admit(BackendCall::Post(id))?;
        self.upsert(id, spec);
        tracing::debug!("posted {id}: {}", spec.title);
        Ok(())
    }

    fn cancel(&mut self, id: NotificationId) -> Result<(), BackendError> {
        self.admit(BackendCall::Cancel(id))?;
        if self.displayed.remove(&id).is_some() {
            tracing::debug!("cancelled {id}");
        }
        if self.foreground == Some(id) {
            self.foreground = None;
        }
        Ok(())
    }

    fn promote_foreground(
        &mut self,
        id: NotificationId,
        spec: &NotificationSpec,
    ) -> Result<(), BackendError> {
        self.admit(BackendCall::PromoteForeground(id))?;
        self.upsert(id, spec);
        self.foreground = Some(id);
        tracing::debug!("foreground with {id}: {}", spec.title);
        Ok(())
    }

    fn demote_foreground(&mut self) -> Result<(), BackendError> {
        self.admit(BackendCall::DemoteForeground)?;
        if let Some(id) = self.foreground.take() {
            tracing::debug!("left foreground, {id} stays displayed");
        }
        Ok(())
    }
}
