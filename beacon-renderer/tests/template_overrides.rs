use std::fs;

use beacon_core::content::{Content, PersistentContent};
use beacon_renderer::{RenderError, TemplateResolver, TextResolver};
use tempfile::TempDir;

fn write_override(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write override");
}

#[test]
fn user_template_overrides_embedded_title() {
    let dir = TempDir::new().expect("tempdir");
    write_override(&dir, "restart/title.tera", "Neustart erforderlich");

    let resolver = TemplateResolver::with_overrides(dir.path()).expect("resolver");
    let text = resolver.resolve(&Content::Restart).expect("resolve");
    assert_eq!(text.title, "Neustart erforderlich");
    assert!(
        text.body.is_some(),
        "body template was not overridden and should still render"
    );
}

#[test]
fn override_can_blank_a_body() {
    let dir = TempDir::new().expect("tempdir");
    write_override(&dir, "persistent_running_foreground/body.tera", "   \n");

    let resolver = TemplateResolver::with_overrides(dir.path()).expect("resolver");
    let text = resolver
        .resolve(&Content::Persistent {
            variant: PersistentContent::RunningForeground,
        })
        .expect("resolve");
    assert!(text.body.is_none(), "whitespace-only body renders as no body");
}

#[test]
fn override_names_are_case_insensitive() {
    let dir = TempDir::new().expect("tempdir");
    write_override(&dir, "Event/Title.tera", "Sync update");

    let resolver = TemplateResolver::with_overrides(dir.path()).expect("resolver");
    let text = resolver
        .resolve(&Content::Event {
            text: "done".into(),
        })
        .expect("resolve");
    assert_eq!(text.title, "Sync update");
}

#[test]
fn non_tera_files_are_ignored() {
    let dir = TempDir::new().expect("tempdir");
    write_override(&dir, "restart/title.txt", "ignored");

    let resolver = TemplateResolver::with_overrides(dir.path()).expect("resolver");
    let text = resolver.resolve(&Content::Restart).expect("resolve");
    assert_eq!(text.title, "Restart required");
}

#[test]
fn missing_override_dir_uses_embedded_templates() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("does-not-exist");
    let resolver = TemplateResolver::with_overrides(&missing).expect("resolver");
    assert!(resolver.resolve(&Content::Restart).is_ok());
}

#[test]
fn broken_override_fails_at_construction() {
    let dir = TempDir::new().expect("tempdir");
    write_override(&dir, "crash/title.tera", "{{ title ");

    let err = TemplateResolver::with_overrides(dir.path())
        .err()
        .expect("unterminated tag must fail to parse");
    assert!(matches!(err, RenderError::Tera(_)), "got: {err}");
}

#[test]
fn override_referencing_unknown_variable_fails_at_resolve() {
    let dir = TempDir::new().expect("tempdir");
    write_override(&dir, "restart/body.tera", "{{ missing_variable }}");

    let resolver = TemplateResolver::with_overrides(dir.path()).expect("resolver");
    let err = resolver.resolve(&Content::Restart).unwrap_err();
    assert!(matches!(err, RenderError::Tera(_)), "got: {err}");
}
