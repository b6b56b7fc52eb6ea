//! # beacon-renderer
//!
//! Tera-based text resolution: turns the semantic [`Content`] descriptors the
//! policy emits into display titles and bodies.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use beacon_core::Content;
//! use beacon_renderer::{TemplateResolver, TextResolver};
//!
//! fn show(content: &Content) {
//!     if let Ok(resolver) = TemplateResolver::new() {
//!         if let Ok(text) = resolver.resolve(content) {
//!             println!("{}: {:?}", text.title, text.body);
//!         }
//!     }
//! }
//! ```
//!
//! [`Content`]: beacon_core::Content

pub mod context;
pub mod engine;
pub mod error;

pub use context::TextContext;
pub use engine::{FallbackResolver, ResolvedText, TemplateEngine, TemplateResolver, TextResolver};
pub use error::RenderError;
