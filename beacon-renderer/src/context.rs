//! Template context: serializable rendering payload built from [`Content`].

use serde::{Deserialize, Serialize};

use beacon_core::content::{Content, APP_NAME};

use crate::error::RenderError;

/// Variables visible to every template.
///
/// `title` is only set for crash alerts and `text` only for event alerts;
/// templates for other kinds never reference them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContext {
    pub app_name: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TextContext {
    /// Build the context for `content` using the default application name.
    pub fn from_content(content: &Content) -> Self {
        Self::with_app_name(content, APP_NAME)
    }

    pub fn with_app_name(content: &Content, app_name: &str) -> Self {
        let (title, text) = match content {
            Content::Crash { title } => (Some(title.clone()), None),
            Content::Event { text } => (None, Some(text.clone())),
            _ => (None, None),
        };
        TextContext {
            app_name: app_name.to_string(),
            kind: content.key().to_string(),
            title,
            text,
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::content::PersistentContent;

    #[test]
    fn crash_context_carries_title_only() {
        let ctx = TextContext::from_content(&Content::Crash {
            title: "Sync crashed".into(),
        });
        assert_eq!(ctx.kind, "crash");
        assert_eq!(ctx.title.as_deref(), Some("Sync crashed"));
        assert!(ctx.text.is_none());
    }

    #[test]
    fn persistent_context_has_no_payload() {
        let ctx = TextContext::with_app_name(
            &Content::Persistent {
                variant: PersistentContent::Running,
            },
            "Relay",
        );
        assert_eq!(ctx.app_name, "Relay");
        assert_eq!(ctx.kind, "persistent_running");
        assert!(ctx.title.is_none() && ctx.text.is_none());
    }

    #[test]
    fn to_tera_context_succeeds() {
        let ctx = TextContext::from_content(&Content::Event {
            text: "done".into(),
        });
        let tera_ctx = ctx.to_tera_context().expect("context conversion");
        assert!(tera_ctx.contains_key("text"));
        assert!(!tera_ctx.contains_key("title"));
    }
}
