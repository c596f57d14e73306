use pretty_assertions::assert_eq;
use speclint_lib::config::Config;
use speclint_lib::lint_context::LintContext;
use speclint_lib::rule::{LintWarning, Rule};
use speclint_lib::rules::SL002AllowedAnchors;

fn check_with(rule: &dyn Rule, content: &str) -> Vec<LintWarning> {
    let ctx = LintContext::new(content, None);
    rule.check(&ctx).unwrap()
}

fn check(content: &str) -> Vec<LintWarning> {
    check_with(&SL002AllowedAnchors::new(), content)
}

fn lines_and_messages(warnings: &[LintWarning]) -> Vec<(usize, &str)> {
    warnings.iter().map(|w| (w.line, w.message.as_str())).collect()
}

const WELL_FORMED: &str = r#"# Format

## 1 Packing

- Spec ID: `NP.core.pack` <a id="spec-core-pack"></a>

<a id="ref-rust-pack"></a>

```rust
fn pack() {}
```

### `Pack()` Algorithm

<a id="algo-pack"></a>

1. Read the input. <a id="algo-pack-step-1"></a>
2. Write the header. <a id="algo-pack-step-2"></a>
   - Pad to eight bytes. <a id="algo-pack-step-2-1"></a>
"#;

#[test]
fn test_well_formed_document() {
    assert!(check(WELL_FORMED).is_empty());
}

#[test]
fn test_algorithm_scenario() {
    let content = "#### `x()` Algorithm\n\n<a id=\"algo-x\"></a>\n\n1. step\n";
    assert!(check(content).is_empty());
}

#[test]
fn test_spec_anchor_alone() {
    let warnings = check("<a id=\"spec-foo\"></a>\n");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("NP."));
}

#[test]
fn test_shape_violations() {
    let content = "Two <a id=\"spec-a\"></a> <a id=\"spec-b\"></a>\n\
                   Named <a name=\"spec-a\"></a>\n\
                   Bad <a id=\"Bad_Id\"></a>\n\
                   Middle <a id=\"spec-a\"></a> of the line\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![
            (1, "Only one <a id=\"...\"></a> anchor is allowed per line."),
            (2, "Only <a id=\"...\"></a> anchors are allowed, with id as the only attribute."),
            (3, "Anchor id must match one of the configured allowedIdPatterns."),
            (
                4,
                "Anchors must appear at the end of the line (or be a standalone reference anchor line above a fenced code block)."
            ),
        ]
    );
}

#[test]
fn test_reference_anchor_needs_fence() {
    let content = "<a id=\"ref-rust-x\"></a>\nfn x() {}\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![(
            1,
            "Reference anchor line must be followed by a blank line and then a fenced code block."
        )]
    );

    let content = "See <a id=\"ref-rust-x\"></a>\n\n```rust\n```\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![(1, "Reference anchors must be on their own line directly above a fenced code block.")]
    );
}

#[test]
fn test_algorithm_anchor_outside_section() {
    let content = "## Overview\n\n<a id=\"algo-x\"></a>\n\n1. step\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![(3, "Algorithm anchors must appear within an Algorithm section.")]
    );
}

#[test]
fn test_second_algorithm_anchor_in_section() {
    let content = "### `x()` Algorithm\n\n<a id=\"algo-x\"></a>\n\n1. step\n\n<a id=\"algo-y\"></a>\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![(7, "Only one Algorithm anchor is allowed per Algorithm section.")]
    );
}

#[test]
fn test_algorithm_anchor_must_follow_heading_and_precede_list() {
    let content = "### `x()` Algorithm\n\nIntro text.\n\n<a id=\"algo-x\"></a>\n\n1. step\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![(
            5,
            "Algorithm anchor line must appear immediately after the Algorithm heading (allowing blank lines)."
        )]
    );

    let content = "### `x()` Algorithm\n<a id=\"algo-x\"></a>\nText\n";
    assert_eq!(
        lines_and_messages(&check(content)),
        vec![(
            2,
            "Algorithm anchor line must be followed by a blank line and then the procedure list (ordered or unordered)."
        )]
    );
}

#[test]
fn test_step_anchor_placement() {
    let step_message = "Algorithm step anchors must be appended to the end of an ordered or unordered list item line within an Algorithm section.";

    let content = "### `x()` Algorithm\n\nParagraph <a id=\"algo-x-step-1\"></a>\n";
    assert_eq!(lines_and_messages(&check(content)), vec![(3, step_message)]);

    // A heading at the same level closes the section
    let content = "### `x()` Algorithm\n\n1. ok <a id=\"algo-x-step-1\"></a>\n\n### Notes\n\n1. late <a id=\"algo-x-step-2\"></a>\n";
    assert_eq!(lines_and_messages(&check(content)), vec![(7, step_message)]);

    // A deeper heading keeps it open
    let content = "### `x()` Algorithm\n\n#### Details\n\n1. ok <a id=\"algo-x-step-1\"></a>\n";
    assert!(check(content).is_empty());
}

#[test]
fn test_anchors_in_code_are_ignored() {
    let content = "Use `<a id=\"x\"></a>` for anchors.\n\n```html\n<a id=\"whatever\" class=\"x\"></a>\n```\n";
    assert!(check(content).is_empty());
}

#[test]
fn test_relaxed_placement_from_config() {
    let config = Config::from_toml_str("[SL002]\nstrict-placement = false\n").unwrap();
    let rule = SL002AllowedAnchors::from_config(&config);
    assert!(check_with(rule.as_ref(), "<a id=\"spec-foo\"></a>\n").is_empty());
    assert_eq!(check_with(rule.as_ref(), "<a id=\"nope\"></a>\n").len(), 1);
}

#[test]
fn test_custom_id_patterns_from_config() {
    let config = Config::from_toml_str(
        "[allowed-anchors]\nallowed-id-patterns = [\"^sec-(?!tmp)[a-z]+$\"]\nstrict-placement = false\n",
    )
    .unwrap();
    let rule = SL002AllowedAnchors::from_config(&config);
    assert!(check_with(rule.as_ref(), "Text <a id=\"sec-intro\"></a>\n").is_empty());
    assert_eq!(check_with(rule.as_ref(), "Text <a id=\"sec-tmp\"></a>\n").len(), 1);
    assert_eq!(check_with(rule.as_ref(), "Text <a id=\"spec-intro\"></a>\n").len(), 1);
}
