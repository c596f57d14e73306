use speclint_lib::lint_context::LintContext;
use speclint_lib::rule::Rule;
use speclint_lib::rules::SL004NoUnicodeArrows;

#[test]
fn test_arrows_flagged_outside_code() {
    let rule = SL004NoUnicodeArrows;
    let content = "a → b\n`x → y`\n```\nc ← d\n```\ne ⤴ f\nplain => text\n";
    let ctx = LintContext::new(content, None);
    let warnings = rule.check(&ctx).unwrap();

    let lines: Vec<(usize, usize)> = warnings.iter().map(|w| (w.line, w.column)).collect();
    assert_eq!(lines, vec![(1, 3), (6, 3)]);
    assert!(
        warnings
            .iter()
            .all(|w| w.message == "Unicode arrow characters are not allowed. Use '=>' instead.")
    );
}

#[test]
fn test_other_symbols_pass() {
    let rule = SL004NoUnicodeArrows;
    let ctx = LintContext::new("x ≥ y and — dash\n", None);
    assert!(rule.check(&ctx).unwrap().is_empty());
}
