use pretty_assertions::assert_eq;
use speclint_lib::lint_context::LintContext;
use speclint_lib::rule::{LintWarning, Rule};
use speclint_lib::rules::{NumberingPolicy, SL001HeadingNumbering};

fn check(content: &str) -> Vec<LintWarning> {
    let rule = SL001HeadingNumbering::default();
    let ctx = LintContext::new(content, None);
    rule.check(&ctx).unwrap()
}

fn check_document(content: &str) -> Vec<LintWarning> {
    let rule = SL001HeadingNumbering::new(NumberingPolicy::Document);
    let ctx = LintContext::new(content, None);
    rule.check(&ctx).unwrap()
}

fn lines_and_messages(warnings: &[LintWarning]) -> Vec<(usize, &str)> {
    warnings.iter().map(|w| (w.line, w.message.as_str())).collect()
}

#[test]
fn test_consistent_numbering() {
    let content = "# Title\n\n## 1 Intro\n\n## 2 Body\n\n### 2.1 Detail\n\n### 2.2 More\n\n## 3 End\n";
    assert!(check(content).is_empty());
}

#[test]
fn test_unnumbered_document_is_ignored() {
    let content = "# Title\n## Intro\n### Scope\n## Body\n";
    assert!(check(content).is_empty());
}

#[test]
fn test_middle_heading_renumbered() {
    let content = "# Title\n## 1 One\n## 5 Two\n## 3 Three\n";
    let warnings = check(content);
    assert_eq!(
        lines_and_messages(&warnings),
        vec![(3, "Non-sequential numbering in this section: got '5', expected '2'.")]
    );
    assert_eq!(warnings[0].context, "## 5 Two");
    assert_eq!(warnings[0].rule_name.as_deref(), Some("SL001"));
}

#[test]
fn test_numbered_title_scenario() {
    let content = "# 1 Intro\n## 1.1 Background\n## 1.3 Details\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![(3, "Non-sequential numbering in this section: got '1.3', expected '1.2'.")]
    );
}

#[test]
fn test_missing_prefix_among_numbered_siblings() {
    let content = "# Title\n## 1 Intro\n## Appendix\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![(3, "This section uses numbering; add a number prefix to match siblings.")]
    );
}

#[test]
fn test_period_inconsistency() {
    let content = "# Title\n## 1. Intro\n## 2 Body\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![(3, "Period inconsistency in this section: use period after number to match sibling.")]
    );
}

#[test]
fn test_zero_based_group() {
    assert!(check("# Title\n## 0 Overview\n## 1 Model\n## 2 Format\n").is_empty());

    let warnings = check("# Title\n## 0 Overview\n## 2 Model\n");
    assert_eq!(
        lines_and_messages(&warnings),
        vec![(3, "Non-sequential numbering in this section: got '2', expected '1'.")]
    );
}

#[test]
fn test_segment_count_and_sequence_reported_independently() {
    let content = "# Title\n## 1 Intro\n### 1 Scope\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![
            (3, "H3 heading has 1 number(s), expected 2 (level - numbering root)."),
            (3, "Non-sequential numbering in this section: got '1', expected '1.1'."),
        ]
    );
}

#[test]
fn test_numbering_restarts_under_unnumbered_parent() {
    let content = "# Title\n## Overview\n### 1 Goals\n### 2 Scope\n## Details\n### 1 Layout\n";
    assert!(check(content).is_empty());
}

#[test]
fn test_fenced_headings_ignored() {
    let content = "# Title\n## 1 Intro\n```markdown\n## 7 Not a heading\n```\n## 2 Body\n";
    assert!(check(content).is_empty());
}

#[test]
fn test_idempotent() {
    let content = "# Title\n## 1 A\n## 3 B\n### 3.2 C\n## D\n";
    assert_eq!(check(content), check(content));
    assert!(!check(content).is_empty());
}

#[test]
fn test_document_policy_requires_numbered_first_h2() {
    let content = "# Title\n## Intro\n## 5 Body\n";
    assert!(check_document(content).is_empty());
    assert_eq!(check(content).len(), 2);
}

#[test]
fn test_document_policy_sequence() {
    let content = "# Title\n## 1 A\n### 1.1 X\n## 3 B\n";
    assert_eq!(
        lines_and_messages(&check_document(content)),
        vec![(4, "Non-sequential numbering: got '3', expected '2'.")]
    );
}

#[test]
fn test_document_policy_h2_period() {
    let content = "# Title\n## 1. A\n## 2 B\n";
    assert_eq!(
        lines_and_messages(&check_document(content)),
        vec![(3, "H2 period inconsistency: use period after number to match first H2.")]
    );
}

#[test]
fn test_policy_from_config() {
    let config = speclint_lib::config::Config::from_toml_str("[heading-numbering]\npolicy = \"document\"\n").unwrap();
    let rule = SL001HeadingNumbering::from_config(&config);
    let ctx = LintContext::new("# Title\n## Intro\n## 5 Body\n", None);
    assert!(rule.check(&ctx).unwrap().is_empty());
}
