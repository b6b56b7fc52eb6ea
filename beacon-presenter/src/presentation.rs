//! What gets handed to the backend.
//!
//! A [`Presentation`] is the policy's output for one notification: semantic
//! content plus display flags. Once the text resolver has produced strings it
//! becomes a [`NotificationSpec`], the builder spec the backend consumes.

use serde::{Deserialize, Serialize};

use beacon_core::{Category, Content, LinkTarget, NotificationId, Priority};
use beacon_renderer::ResolvedText;

/// One notification as decided by the policy, before text resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub id: NotificationId,
    pub content: Content,
    pub priority: Priority,
    pub target: LinkTarget,
    /// Cannot be swiped away.
    pub ongoing: bool,
    /// Dismissed when tapped.
    pub auto_cancel: bool,
    /// Re-posting does not sound or vibrate again.
    pub alert_once: bool,
    /// Body is also shown in expandable long-text form.
    pub long_text: bool,
    /// Body doubles as the status-bar ticker.
    pub ticker: bool,
    pub category: Option<Category>,
}

impl Presentation {
    /// Plain alert with default flags; callers adjust fields as needed.
    pub fn alert(id: NotificationId, content: Content, target: LinkTarget) -> Self {
        Presentation {
            id,
            content,
            priority: Priority::Default,
            target,
            ongoing: false,
            auto_cancel: true,
            alert_once: false,
            long_text: false,
            ticker: false,
            category: None,
        }
    }
}

/// Fully resolved builder spec for the presentation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSpec {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    pub priority: Priority,
    pub ongoing: bool,
    pub auto_cancel: bool,
    pub alert_once: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub target: LinkTarget,
}

impl NotificationSpec {
    pub fn build(presentation: &Presentation, text: ResolvedText) -> Self {
        let ResolvedText { title, body } = text;
        NotificationSpec {
            expanded_body: body.clone().filter(|_| presentation.long_text),
            ticker: body.clone().filter(|_| presentation.ticker),
            title,
            body,
            priority: presentation.priority,
            ongoing: presentation.ongoing,
            auto_cancel: presentation.auto_cancel,
            alert_once: presentation.alert_once,
            category: presentation.category,
            target: presentation.target.clone(),
        }
    }
}
