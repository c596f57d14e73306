use crate::rule::{LintResult, LintWarning, Rule, Severity};

/// Arrows (U+2190..U+21FF) and supplemental arrows-B (U+2900..U+297F)
fn is_unicode_arrow(c: char) -> bool {
    matches!(c, '\u{2190}'..='\u{21FF}' | '\u{2900}'..='\u{297F}')
}

#[derive(Debug, Clone, Default)]
pub struct SL004NoUnicodeArrows;

impl Rule for SL004NoUnicodeArrows {
    fn name(&self) -> &'static str {
        "SL004"
    }

    fn alias(&self) -> &'static str {
        "no-unicode-arrows"
    }

    fn description(&self) -> &'static str {
        "Unicode arrows are not allowed in prose"
    }

    fn should_skip(&self, ctx: &crate::lint_context::LintContext) -> bool {
        !ctx.has_non_ascii()
    }

    fn check(&self, ctx: &crate::lint_context::LintContext) -> LintResult {
        let warnings = ctx
            .lines
            .iter()
            .filter(|line| line.is_scannable())
            .filter_map(|line| {
                let position = line.scan_text.chars().position(is_unicode_arrow)?;
                Some(LintWarning {
                    rule_name: Some(self.name().to_string()),
                    line: line.line_number(),
                    column: position + 1,
                    message: "Unicode arrow characters are not allowed. Use '=>' instead.".to_string(),
                    context: line.raw.to_string(),
                    severity: Severity::Error,
                })
            })
            .collect();

        Ok(warnings)
    }

    fn from_config(_config: &crate::config::Config) -> Box<dyn Rule>
    where
        Self: Sized,
    {
        Box::new(SL004NoUnicodeArrows)
    }
}
