use speclint_lib::config::Config;
use speclint_lib::lint_context::LintContext;
use speclint_lib::rule::{LintWarning, Rule};
use speclint_lib::rules::SL003AsciiOnly;
use std::path::PathBuf;

fn check_with(rule: &dyn Rule, content: &str, path: Option<&str>) -> Vec<LintWarning> {
    let ctx = LintContext::new(content, path.map(PathBuf::from));
    rule.check(&ctx).unwrap()
}

#[test]
fn test_flags_first_offending_char_per_line() {
    let rule = SL003AsciiOnly::default();
    let warnings = check_with(&rule, "# Título\nplain\n“quoted” text\n", Some("docs/spec.md"));
    assert_eq!(warnings.len(), 2);
    assert_eq!((warnings[0].line, warnings[0].column), (1, 4));
    assert_eq!((warnings[1].line, warnings[1].column), (3, 1));
    assert_eq!(warnings[1].context, "“quoted” text");
}

#[test]
fn test_no_source_path_is_never_exempt() {
    let rule = SL003AsciiOnly::default();
    assert_eq!(check_with(&rule, "README says héllo\n", None).len(), 1);
}

#[test]
fn test_inline_code_and_fences_are_skipped() {
    let rule = SL003AsciiOnly::default();
    let content = "Use `é` inline.\n\n~~~\nλx → y\n~~~\n";
    assert!(check_with(&rule, content, Some("docs/spec.md")).is_empty());
}

#[test]
fn test_emoji_with_variation_selector() {
    let rule = SL003AsciiOnly::default();
    assert!(check_with(&rule, "Careful ⚠️\n", Some("dev_docs/plan.md")).is_empty());
    assert_eq!(check_with(&rule, "Careful ⚠️\n", Some("docs/plan.md")).len(), 1);
}

#[test]
fn test_configured_paths_and_emoji() {
    let config = Config::from_toml_str(
        r#"
[ascii-only]
allowed-path-patterns-unicode = ["i18n/**"]
allowed-path-patterns-emoji = ["notes/**"]
allowed-emoji = ["🚀"]
"#,
    )
    .unwrap();
    let rule = SL003AsciiOnly::from_config(&config);

    assert!(check_with(rule.as_ref(), "Grüße\n", Some("i18n/de.md")).is_empty());
    assert!(check_with(rule.as_ref(), "Launch 🚀\n", Some("notes/todo.md")).is_empty());

    let warnings = check_with(rule.as_ref(), "Done ✅\n", Some("notes/todo.md"));
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "Non-ASCII only allowed here: 🚀. Use ASCII or remove.");

    // The default README exemption was replaced
    assert_eq!(check_with(rule.as_ref(), "naïve\n", Some("README.md")).len(), 1);
}

#[test]
fn test_readme_exempt_at_any_depth() {
    let rule = SL003AsciiOnly::default();
    for path in ["README.md", "docs/README.md", "/repo/api/v2/README.md"] {
        assert!(check_with(&rule, "naïve café\n", Some(path)).is_empty(), "{path}");
    }
    assert_eq!(check_with(&rule, "naïve café\n", Some("README.markdown")).len(), 1);
}
