//! Inline configuration comments
//!
//! Supports, with either a `speclint-` or a `markdownlint-` prefix:
//! - `<!-- speclint-disable -->` / `<!-- speclint-enable -->` - all rules from this point
//! - `<!-- speclint-disable SL001 ascii-only -->` - specific rules from this point
//! - `<!-- speclint-disable-line SL002 -->` - rules for the current line
//! - `<!-- speclint-disable-next-line SL002 -->` - rules for the next line
//! - `<!-- speclint-disable-file -->` / `<!-- speclint-enable-file -->` - rules for the whole file
//! - `<!-- speclint-capture -->` / `<!-- speclint-restore -->` - save and restore the current state
//!
//! Rule lists accept codes or aliases. Comments inside fenced code blocks are ignored.

use crate::config::normalize_rule_name;
use crate::utils::FenceTracker;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"<!--\s*(?:speclint|markdownlint)-(disable-next-line|disable-line|disable-file|enable-file|disable|enable|capture|restore)((?:\s+[\w-]+)*)\s*-->",
    )
    .unwrap()
});

/// One inline configuration comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Disable(Vec<String>),
    Enable(Vec<String>),
    DisableLine(Vec<String>),
    DisableNextLine(Vec<String>),
    DisableFile(Vec<String>),
    EnableFile(Vec<String>),
    Capture,
    Restore,
}

/// Parse every directive on a line, in order of appearance.
///
/// Rule lists are normalized to rule codes; an empty list means all rules.
pub fn parse_directives(line: &str) -> Vec<Directive> {
    if !line.contains("<!--") {
        return Vec::new();
    }

    DIRECTIVE
        .captures_iter(line)
        .filter_map(|caps| {
            let rules: Vec<String> = caps
                .get(2)
                .map(|m| m.as_str().split_whitespace().map(normalize_rule_name).collect())
                .unwrap_or_default();

            match caps.get(1)?.as_str() {
                "disable" => Some(Directive::Disable(rules)),
                "enable" => Some(Directive::Enable(rules)),
                "disable-line" => Some(Directive::DisableLine(rules)),
                "disable-next-line" => Some(Directive::DisableNextLine(rules)),
                "disable-file" => Some(Directive::DisableFile(rules)),
                "enable-file" => Some(Directive::EnableFile(rules)),
                "capture" => Some(Directive::Capture),
                "restore" => Some(Directive::Restore),
                _ => None,
            }
        })
        .collect()
}

/// Which rules are switched off at some point in the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RuleState {
    /// Everything is off except `enabled`
    all_disabled: bool,
    disabled: HashSet<String>,
    enabled: HashSet<String>,
}

impl RuleState {
    fn disable(&mut self, rules: &[String]) {
        if rules.is_empty() {
            *self = Self {
                all_disabled: true,
                ..Self::default()
            };
        } else if self.all_disabled {
            for rule in rules {
                self.enabled.remove(rule);
            }
        } else {
            self.disabled.extend(rules.iter().cloned());
        }
    }

    fn enable(&mut self, rules: &[String]) {
        if rules.is_empty() {
            *self = Self::default();
        } else if self.all_disabled {
            self.enabled.extend(rules.iter().cloned());
        } else {
            for rule in rules {
                self.disabled.remove(rule);
            }
        }
    }

    fn disables(&self, rule: &str) -> bool {
        if self.all_disabled {
            !self.enabled.contains(rule)
        } else {
            self.disabled.contains(rule)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InlineConfig {
    /// State in force on each line (index = line - 1), before that line's own comments
    state_at_line: Vec<RuleState>,
    /// Rules disabled for single lines via disable-line / disable-next-line ("*" = all)
    line_disabled_rules: HashMap<usize, HashSet<String>>,
    file_state: RuleState,
}

impl InlineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process all inline comments in the content
    pub fn from_content(content: &str) -> Self {
        let mut config = Self::new();
        let mut current = RuleState::default();
        let mut captured: Vec<RuleState> = Vec::new();
        let mut fence = FenceTracker::new();

        for (idx, line) in content.lines().enumerate() {
            let line_num = idx + 1;
            config.state_at_line.push(current.clone());

            let was_in_fence = fence.in_fence();
            fence.advance(line);
            if was_in_fence || fence.in_fence() {
                continue;
            }

            for directive in parse_directives(line) {
                match directive {
                    Directive::Disable(rules) => current.disable(&rules),
                    Directive::Enable(rules) => current.enable(&rules),
                    Directive::DisableLine(rules) => config.disable_for_line(line_num, rules),
                    Directive::DisableNextLine(rules) => config.disable_for_line(line_num + 1, rules),
                    Directive::DisableFile(rules) => config.file_state.disable(&rules),
                    Directive::EnableFile(rules) => config.file_state.enable(&rules),
                    Directive::Capture => captured.push(current.clone()),
                    Directive::Restore => {
                        if let Some(state) = captured.pop() {
                            current = state;
                        }
                    }
                }
            }
        }

        config
    }

    fn disable_for_line(&mut self, line_num: usize, rules: Vec<String>) {
        let line_rules = self.line_disabled_rules.entry(line_num).or_default();
        if rules.is_empty() {
            line_rules.insert("*".to_string());
        } else {
            line_rules.extend(rules);
        }
    }

    /// Check if a rule is disabled at a specific 1-based line
    pub fn is_rule_disabled(&self, rule_name: &str, line_number: usize) -> bool {
        if self.file_state.disables(rule_name) {
            return true;
        }

        if let Some(line_rules) = self.line_disabled_rules.get(&line_number)
            && (line_rules.contains("*") || line_rules.contains(rule_name))
        {
            return true;
        }

        line_number
            .checked_sub(1)
            .and_then(|idx| self.state_at_line.get(idx))
            .is_some_and(|state| state.disables(rule_name))
    }

    /// Whether no comment changed any rule state
    pub fn is_empty(&self) -> bool {
        self.line_disabled_rules.is_empty()
            && self.file_state == RuleState::default()
            && self.state_at_line.iter().all(|s| *s == RuleState::default())
    }
}
