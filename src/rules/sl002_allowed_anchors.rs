//!
//! Rule SL002: Only bare `<a id="..."></a>` anchors with configured ids, placed by kind
//!
//! Anchor placement depends on which Algorithm section a line falls in, so the
//! check is a single forward scan threading a [`SectionScanState`] through the
//! classified lines, with at most two lines of lookahead and a bounded walk
//! back over blank lines.

use crate::lint_context::{ClassifiedLine, classify_lines};
use crate::rule::{LintResult, Rule, Severity, Violation};
use crate::rule_config_serde::RuleConfig;
use crate::rules::heading_utils::heading_level;
use crate::utils::{FenceTracker, FenceTransition, is_algorithm_heading, is_blank, is_fence_start, is_list_item_start};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static ANCHOR_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"<a id="([^"]+)"></a>"#).unwrap());

static ANCHOR_AT_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"<a id="([^"]+)"></a>\s*$"#).unwrap());

// "- Spec ID: `NP.core.pack`"
static SPEC_ID_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-\s+Spec ID:\s+`NP\.[^`]+`").unwrap());

const MSG_ONE_PER_LINE: &str = "Only one <a id=\"...\"></a> anchor is allowed per line.";
const MSG_BARE_ANCHOR: &str = "Only <a id=\"...\"></a> anchors are allowed, with id as the only attribute.";
const MSG_ID_PATTERN: &str = "Anchor id must match one of the configured allowedIdPatterns.";
const MSG_END_OF_LINE: &str =
    "Anchors must appear at the end of the line (or be a standalone reference anchor line above a fenced code block).";
const MSG_SPEC_PLACEMENT: &str = "Spec anchors must be appended to the end of the '- Spec ID: `NP....`' list item line.";
const MSG_REF_OWN_LINE: &str = "Reference anchors must be on their own line directly above a fenced code block.";
const MSG_REF_FOLLOWED_BY_FENCE: &str = "Reference anchor line must be followed by a blank line and then a fenced code block.";
const MSG_ALGO_OWN_LINE: &str = "Algorithm anchors must be on their own line at the start of an Algorithm section.";
const MSG_ALGO_IN_SECTION: &str = "Algorithm anchors must appear within an Algorithm section.";
const MSG_ALGO_ONE_PER_SECTION: &str = "Only one Algorithm anchor is allowed per Algorithm section.";
const MSG_ALGO_AFTER_HEADING: &str =
    "Algorithm anchor line must appear immediately after the Algorithm heading (allowing blank lines).";
const MSG_ALGO_BEFORE_LIST: &str =
    "Algorithm anchor line must be followed by a blank line and then the procedure list (ordered or unordered).";
const MSG_STEP_PLACEMENT: &str = "Algorithm step anchors must be appended to the end of an ordered or unordered list item line within an Algorithm section.";

pub const DEFAULT_ALLOWED_ID_PATTERNS: &[&str] = &[
    "^spec-[a-z0-9-]+$",
    "^ref-[a-z0-9]+-[a-z0-9-]+$",
    "^algo-[a-z0-9-]+$",
    "^algo-[a-z0-9-]+-step-[0-9]+(?:-[0-9]+)*$",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SL002Config {
    /// Regular expressions an anchor id must match (any one of)
    #[serde(default = "default_allowed_id_patterns")]
    pub allowed_id_patterns: Vec<String>,
    /// Enforce where each kind of anchor may appear
    #[serde(default = "default_true")]
    pub strict_placement: bool,
}

fn default_allowed_id_patterns() -> Vec<String> {
    DEFAULT_ALLOWED_ID_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_true() -> bool {
    true
}

impl Default for SL002Config {
    fn default() -> Self {
        Self {
            allowed_id_patterns: default_allowed_id_patterns(),
            strict_placement: true,
        }
    }
}

impl RuleConfig for SL002Config {
    const RULE_NAME: &'static str = "SL002";
}

/// Compiled anchor options
#[derive(Debug, Clone)]
pub struct AnchorOptions {
    pub allowed_id_patterns: Vec<fancy_regex::Regex>,
    pub strict_placement: bool,
}

impl AnchorOptions {
    /// Compile configured patterns; ones that fail to compile are skipped
    pub fn compile(config: &SL002Config) -> Self {
        let allowed_id_patterns = config
            .allowed_id_patterns
            .iter()
            .filter_map(|pattern| match fancy_regex::Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    log::warn!("Skipping invalid anchor id pattern '{pattern}': {e}");
                    None
                }
            })
            .collect();

        Self {
            allowed_id_patterns,
            strict_placement: config.strict_placement,
        }
    }

    fn id_is_allowed(&self, id: &str) -> bool {
        self.allowed_id_patterns
            .iter()
            .any(|re| re.is_match(id).unwrap_or(false))
    }
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self::compile(&SL002Config::default())
    }
}

/// Placement family of an anchor, decided by its id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    /// `spec-*`
    Spec,
    /// `ref-<lang>-*`
    Reference,
    /// `algo-*` without a step suffix
    Algorithm,
    /// `*-step-<n>[-<n>...]`
    AlgorithmStep,
    /// Any other allowed id; no placement rules apply
    Other,
}

impl AnchorKind {
    pub fn of(id: &str) -> Self {
        if id.starts_with("spec-") {
            Self::Spec
        } else if id.starts_with("ref-") {
            Self::Reference
        } else if id.starts_with("algo-") && !id.contains("-step-") {
            Self::Algorithm
        } else if id.contains("-step-") {
            Self::AlgorithmStep
        } else {
            Self::Other
        }
    }
}

/// State threaded through one document's forward scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionScanState {
    fence: FenceTracker,
    /// Level of the heading that opened the current Algorithm section
    pub algorithm_heading_level: Option<usize>,
    pub seen_algorithm_anchor_in_section: bool,
}

impl SectionScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_algorithm_section(&self) -> bool {
        self.algorithm_heading_level.is_some()
    }

    /// Update fence and section state for the next line.
    ///
    /// Returns false when the line belongs to a fence (delimiters included)
    /// and must not be scanned.
    pub fn enter_line(&mut self, line: &ClassifiedLine<'_>) -> bool {
        let was_in_fence = self.fence.in_fence();
        if self.fence.advance(line.raw) != FenceTransition::None || was_in_fence {
            return false;
        }

        let trimmed = line.raw.trim();
        if let Some(level) = heading_level(trimmed) {
            // A heading at the same or a shallower level ends the section
            if self.algorithm_heading_level.is_some_and(|open| level <= open) {
                self.algorithm_heading_level = None;
                self.seen_algorithm_anchor_in_section = false;
            }
            if is_algorithm_heading(trimmed) {
                self.algorithm_heading_level = Some(level);
                self.seen_algorithm_anchor_in_section = false;
            }
        }
        true
    }
}

/// Validate anchors in raw lines
pub fn validate_anchors<S, F>(raw_lines: &[S], options: &AnchorOptions, report: F)
where
    S: AsRef<str>,
    F: FnMut(Violation),
{
    let classified = classify_lines(raw_lines.iter().map(|l| l.as_ref()));
    validate_classified_anchors(&classified, options, report);
}

/// Validate anchors in already-classified lines; at most one violation per line
pub fn validate_classified_anchors<F>(lines: &[ClassifiedLine<'_>], options: &AnchorOptions, mut report: F)
where
    F: FnMut(Violation),
{
    let mut state = SectionScanState::new();

    for (index, line) in lines.iter().enumerate() {
        if !state.enter_line(line) {
            continue;
        }
        if let Some(detail) = check_line(lines, index, &mut state, options) {
            report(Violation::new(line.line_number(), detail, line.raw));
        }
    }
}

fn check_line(
    lines: &[ClassifiedLine<'_>],
    index: usize,
    state: &mut SectionScanState,
    options: &AnchorOptions,
) -> Option<&'static str> {
    let line = &lines[index];
    let scan = line.scan_text.as_str();

    let first = scan.find("<a")?;
    if scan[first + 1..].contains("<a") {
        return Some(MSG_ONE_PER_LINE);
    }

    let Some(id) = ANCHOR_TAG.captures(scan).and_then(|caps| caps.get(1)).map(|m| m.as_str()) else {
        return Some(MSG_BARE_ANCHOR);
    };
    if !options.id_is_allowed(id) {
        return Some(MSG_ID_PATTERN);
    }
    if !ANCHOR_AT_END.is_match(scan) {
        return Some(MSG_END_OF_LINE);
    }
    if !options.strict_placement {
        return None;
    }

    let raw = line.raw;
    let trimmed = raw.trim();
    let before = raw.rfind("<a").map_or(raw, |pos| &raw[..pos]).trim();
    let standalone = trimmed == format!(r#"<a id="{id}"></a>"#);
    let raw_at = |offset: usize| lines.get(index + offset).map(|l| l.raw);

    match AnchorKind::of(id) {
        AnchorKind::Spec => (!SPEC_ID_ITEM.is_match(before)).then_some(MSG_SPEC_PLACEMENT),
        AnchorKind::Reference => {
            if !standalone {
                return Some(MSG_REF_OWN_LINE);
            }
            let followed_by_fence = raw_at(1).is_some_and(is_blank) && raw_at(2).is_some_and(|l| is_fence_start(l.trim()));
            (!followed_by_fence).then_some(MSG_REF_FOLLOWED_BY_FENCE)
        }
        AnchorKind::Algorithm => {
            if !standalone {
                return Some(MSG_ALGO_OWN_LINE);
            }
            if !state.in_algorithm_section() {
                return Some(MSG_ALGO_IN_SECTION);
            }
            if state.seen_algorithm_anchor_in_section {
                return Some(MSG_ALGO_ONE_PER_SECTION);
            }
            state.seen_algorithm_anchor_in_section = true;

            let previous = lines[..index].iter().rev().find(|l| !is_blank(l.raw));
            if !previous.is_some_and(|l| is_algorithm_heading(l.raw)) {
                return Some(MSG_ALGO_AFTER_HEADING);
            }

            let followed_by_list = raw_at(1).is_some_and(is_blank) && raw_at(2).is_some_and(is_list_item_start);
            (!followed_by_list).then_some(MSG_ALGO_BEFORE_LIST)
        }
        AnchorKind::AlgorithmStep => {
            let on_list_item = !before.is_empty() && state.in_algorithm_section() && is_list_item_start(before);
            (!on_list_item).then_some(MSG_STEP_PLACEMENT)
        }
        AnchorKind::Other => None,
    }
}

#[derive(Clone, Default)]
pub struct SL002AllowedAnchors {
    options: AnchorOptions,
}

impl SL002AllowedAnchors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config_struct(config: SL002Config) -> Self {
        Self {
            options: AnchorOptions::compile(&config),
        }
    }
}

impl Rule for SL002AllowedAnchors {
    fn name(&self) -> &'static str {
        "SL002"
    }

    fn alias(&self) -> &'static str {
        "allowed-anchors"
    }

    fn description(&self) -> &'static str {
        "Anchors must be bare <a id> tags with allowed ids, placed according to their kind"
    }

    fn should_skip(&self, ctx: &crate::lint_context::LintContext) -> bool {
        !ctx.likely_has_anchors()
    }

    fn check(&self, ctx: &crate::lint_context::LintContext) -> LintResult {
        let mut warnings = Vec::new();
        validate_classified_anchors(&ctx.lines, &self.options, |violation| {
            warnings.push(violation.into_warning(self.name(), Severity::Error));
        });
        Ok(warnings)
    }

    fn from_config(config: &crate::config::Config) -> Box<dyn Rule>
    where
        Self: Sized,
    {
        let rule_config = crate::rule_config_serde::load_rule_config::<SL002Config>(config);
        Box::new(Self::from_config_struct(rule_config))
    }

    fn default_config_section(&self) -> Option<(String, toml::Value)> {
        crate::rule_config_serde::default_section::<SL002Config>()
    }
}
