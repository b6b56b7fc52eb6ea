//! Tera rendering engine: [`TextResolver`] and [`TemplateResolver`].
//!
//! # Template layout
//!
//! | Content key                      | Templates                    |
//! |----------------------------------|------------------------------|
//! | `persistent_running`             | `title.tera`, `body.tera`    |
//! | `persistent_running_foreground`  | `title.tera`, `body.tera`    |
//! | `persistent_disabled_foreground` | `title.tera`, `body.tera`    |
//! | `crash`                          | `title.tera`, `body.tera`    |
//! | `restart`                        | `title.tera`, `body.tera`    |
//! | `background_disabled`            | `title.tera`, `body.tera`    |
//! | `event`                          | `title.tera`, `body.tera`    |
//!
//! Each file lives under `<key>/`. A body that renders empty means "no body".

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tera::Tera;

use beacon_core::content::{Content, APP_NAME};

use crate::context::TextContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates: baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    (
        "persistent_running/title.tera",
        include_str!("templates/persistent_running/title.tera"),
    ),
    (
        "persistent_running/body.tera",
        include_str!("templates/persistent_running/body.tera"),
    ),
    (
        "persistent_running_foreground/title.tera",
        include_str!("templates/persistent_running_foreground/title.tera"),
    ),
    (
        "persistent_running_foreground/body.tera",
        include_str!("templates/persistent_running_foreground/body.tera"),
    ),
    (
        "persistent_disabled_foreground/title.tera",
        include_str!("templates/persistent_disabled_foreground/title.tera"),
    ),
    (
        "persistent_disabled_foreground/body.tera",
        include_str!("templates/persistent_disabled_foreground/body.tera"),
    ),
    ("crash/title.tera", include_str!("templates/crash/title.tera")),
    ("crash/body.tera", include_str!("templates/crash/body.tera")),
    ("restart/title.tera", include_str!("templates/restart/title.tera")),
    ("restart/body.tera", include_str!("templates/restart/body.tera")),
    (
        "background_disabled/title.tera",
        include_str!("templates/background_disabled/title.tera"),
    ),
    (
        "background_disabled/body.tera",
        include_str!("templates/background_disabled/body.tera"),
    ),
    ("event/title.tera", include_str!("templates/event/title.tera")),
    ("event/body.tera", include_str!("templates/event/body.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Resolver boundary
// ---------------------------------------------------------------------------

/// Display strings for one piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedText {
    pub title: String,
    pub body: Option<String>,
}

/// Turns semantic content into display strings.
pub trait TextResolver: Send {
    fn resolve(&self, content: &Content) -> Result<ResolvedText, RenderError>;
}

/// Resolver that returns the built-in English text and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResolver;

impl TextResolver for FallbackResolver {
    fn resolve(&self, content: &Content) -> Result<ResolvedText, RenderError> {
        let text = content.fallback_text();
        Ok(ResolvedText {
            title: text.title,
            body: text.body,
        })
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering templates with optional user overrides.
///
/// `user_template_dir` may contain `<key>/title.tera` and `<key>/body.tera`
/// files that override embedded defaults.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`], loading embedded templates plus any
    /// overrides found in `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render the title and body templates for `ctx.kind`.
    pub fn render(&self, ctx: &TextContext) -> Result<ResolvedText, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let title = self
            .tera
            .render(&format!("{}/title.tera", ctx.kind), &tera_ctx)?;
        let body = self
            .tera
            .render(&format!("{}/body.tera", ctx.kind), &tera_ctx)?;

        let body = body.trim();
        Ok(ResolvedText {
            title: title.trim().to_string(),
            body: (!body.is_empty()).then(|| body.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// TemplateResolver
// ---------------------------------------------------------------------------

/// [`TextResolver`] backed by the template engine.
///
/// Create once with [`TemplateResolver::new`] and reuse.
pub struct TemplateResolver {
    engine: TemplateEngine,
    app_name: String,
}

impl TemplateResolver {
    /// Resolver over the embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Ok(TemplateResolver {
            engine: TemplateEngine::new(None)?,
            app_name: APP_NAME.to_string(),
        })
    }

    /// Resolver with user overrides loaded from `dir`.
    pub fn with_overrides(dir: &Path) -> Result<Self, RenderError> {
        Ok(TemplateResolver {
            engine: TemplateEngine::new(Some(dir))?,
            app_name: APP_NAME.to_string(),
        })
    }

    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }
}

impl TextResolver for TemplateResolver {
    fn resolve(&self, content: &Content) -> Result<ResolvedText, RenderError> {
        let ctx = TextContext::with_app_name(content, &self.app_name);
        self.engine.render(&ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
