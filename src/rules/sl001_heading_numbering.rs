use crate::rule::{LintResult, Rule, Severity, Violation};
use crate::rule_config_serde::RuleConfig;
use crate::rules::heading_hierarchy::HeadingOutline;
use crate::rules::heading_utils::Heading;
use serde::{Deserialize, Serialize};

/// How sibling numbering is scoped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NumberingPolicy {
    /// Every sibling group decides for itself whether it is numbered, its
    /// base (0 or 1) and its period style. Segment counts are measured from
    /// the nearest unnumbered ancestor.
    #[default]
    Section,
    /// The first level-2 heading decides for the whole document. Segment
    /// count is always `level - 1`; only level-2 headings may be 0-based.
    Document,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SL001Config {
    #[serde(default)]
    pub policy: NumberingPolicy,
}

impl RuleConfig for SL001Config {
    const RULE_NAME: &'static str = "SL001";
}

/// Check numbering prefixes of `headings` against their outline position.
///
/// `lines` supplies the raw text reported as each violation's context.
/// Violations are reported in ascending line order.
pub fn validate_numbering<S, F>(headings: &[Heading], lines: &[S], policy: NumberingPolicy, mut report: F)
where
    S: AsRef<str>,
    F: FnMut(Violation),
{
    let outline = HeadingOutline::build(headings.to_vec());
    if !(0..outline.len()).any(|idx| outline.prefix(idx).is_numbered()) {
        return;
    }

    let context = |line: usize| -> String {
        line.checked_sub(1)
            .and_then(|idx| lines.get(idx))
            .map(|l| l.as_ref().to_string())
            .unwrap_or_default()
    };

    match policy {
        NumberingPolicy::Section => check_sections(&outline, &context, &mut report),
        NumberingPolicy::Document => check_document(&outline, &context, &mut report),
    }
}

/// `parent.N`, or plain `N` when the parent is missing or unnumbered
fn expected_number(outline: &HeadingOutline, idx: usize, sequence: usize) -> String {
    match outline.parent(idx).and_then(|p| outline.prefix(p).numbering.as_deref()) {
        Some(parent) => format!("{parent}.{sequence}"),
        None => sequence.to_string(),
    }
}

fn period_style(has_period: bool) -> &'static str {
    if has_period { "period" } else { "no period" }
}

fn check_sections(outline: &HeadingOutline, context: &dyn Fn(usize) -> String, report: &mut dyn FnMut(Violation)) {
    for idx in 0..outline.len() {
        let heading = outline.heading(idx);
        let prefix = outline.prefix(idx);
        let first_numbered = outline.first_numbered_sibling(idx);

        let (Some(numbering), Some(first)) = (prefix.numbering.as_deref(), first_numbered) else {
            if first_numbered.is_some() {
                report(Violation::new(
                    heading.line,
                    "This section uses numbering; add a number prefix to match siblings.",
                    context(heading.line),
                ));
            }
            continue;
        };

        let root_level = outline.numbering_root_level(idx);
        let expected_segments = heading.level.saturating_sub(root_level);
        let segments = prefix.segments().len();
        if segments != expected_segments {
            report(Violation::new(
                heading.line,
                format!(
                    "H{} heading has {} number(s), expected {} (level - numbering root).",
                    heading.level, segments, expected_segments
                ),
                context(heading.line),
            ));
        }

        let first_prefix = outline.prefix(first);
        if prefix.has_period != first_prefix.has_period {
            report(Violation::new(
                heading.line,
                format!(
                    "Period inconsistency in this section: use {} after number to match sibling.",
                    period_style(first_prefix.has_period)
                ),
                context(heading.line),
            ));
        }

        let zero_based = first_prefix.segments().last() == Some(&"0");
        let position = outline.sibling_position(idx);
        let expected = expected_number(outline, idx, if zero_based { position } else { position + 1 });
        if numbering != expected {
            report(Violation::new(
                heading.line,
                format!("Non-sequential numbering in this section: got '{numbering}', expected '{expected}'."),
                context(heading.line),
            ));
        }
    }
}

fn check_document(outline: &HeadingOutline, context: &dyn Fn(usize) -> String, report: &mut dyn FnMut(Violation)) {
    let Some(first_h2) = outline.headings().iter().position(|h| h.level == 2) else {
        return;
    };
    let first_h2_prefix = outline.prefix(first_h2);
    if !first_h2_prefix.is_numbered() {
        return;
    }
    let h2_zero_based = first_h2_prefix.numbering.as_deref() == Some("0");
    let h2_period = first_h2_prefix.has_period;

    for idx in 0..outline.len() {
        let heading = outline.heading(idx);
        let prefix = outline.prefix(idx);
        let Some(numbering) = prefix.numbering.as_deref() else {
            continue;
        };

        let expected_segments = heading.level - 1;
        let segments = prefix.segments().len();
        if segments != expected_segments {
            report(Violation::new(
                heading.line,
                format!(
                    "H{} heading has {} number(s), expected {}.",
                    heading.level, segments, expected_segments
                ),
                context(heading.line),
            ));
        }

        if heading.level == 2 && prefix.has_period != h2_period {
            report(Violation::new(
                heading.line,
                format!(
                    "H2 period inconsistency: use {} after number to match first H2.",
                    period_style(h2_period)
                ),
                context(heading.line),
            ));
        }

        let position = outline.sibling_position(idx);
        let sequence = if heading.level == 2 && h2_zero_based {
            position
        } else {
            position + 1
        };
        let expected = expected_number(outline, idx, sequence);
        if numbering != expected {
            report(Violation::new(
                heading.line,
                format!("Non-sequential numbering: got '{numbering}', expected '{expected}'."),
                context(heading.line),
            ));
        }
    }
}

#[derive(Clone, Default)]
pub struct SL001HeadingNumbering {
    config: SL001Config,
}

impl SL001HeadingNumbering {
    pub fn new(policy: NumberingPolicy) -> Self {
        Self {
            config: SL001Config { policy },
        }
    }

    pub fn from_config_struct(config: SL001Config) -> Self {
        Self { config }
    }
}

impl Rule for SL001HeadingNumbering {
    fn name(&self) -> &'static str {
        "SL001"
    }

    fn alias(&self) -> &'static str {
        "heading-numbering"
    }

    fn description(&self) -> &'static str {
        "Heading numbers must match their position in the outline"
    }

    fn should_skip(&self, ctx: &crate::lint_context::LintContext) -> bool {
        !ctx.has_headings()
    }

    fn check(&self, ctx: &crate::lint_context::LintContext) -> LintResult {
        let mut warnings = Vec::new();
        validate_numbering(&ctx.headings, ctx.raw_lines(), self.config.policy, |violation| {
            warnings.push(violation.into_warning(self.name(), Severity::Error));
        });
        Ok(warnings)
    }

    fn from_config(config: &crate::config::Config) -> Box<dyn Rule>
    where
        Self: Sized,
    {
        let rule_config = crate::rule_config_serde::load_rule_config::<SL001Config>(config);
        Box::new(Self::from_config_struct(rule_config))
    }

    fn default_config_section(&self) -> Option<(String, toml::Value)> {
        crate::rule_config_serde::default_section::<SL001Config>()
    }
}
