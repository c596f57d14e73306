pub mod heading_hierarchy;
pub mod heading_utils;

pub mod sl001_heading_numbering;
pub mod sl002_allowed_anchors;
mod sl003_ascii_only;
mod sl004_no_unicode_arrows;

pub use sl001_heading_numbering::{NumberingPolicy, SL001Config, SL001HeadingNumbering, validate_numbering};
pub use sl002_allowed_anchors::{
    AnchorKind, AnchorOptions, SL002AllowedAnchors, SL002Config, SectionScanState, validate_anchors,
};
pub use sl003_ascii_only::{SL003AsciiOnly, SL003Config};
pub use sl004_no_unicode_arrows::SL004NoUnicodeArrows;

use crate::config::{Config, GlobalConfig};
use crate::rule::Rule;
use std::collections::HashSet;

type RuleCtor = fn(&Config) -> Box<dyn Rule>;

/// Rule code, alias and constructor for every rule
const RULES: &[(&str, &str, RuleCtor)] = &[
    ("SL001", "heading-numbering", SL001HeadingNumbering::from_config),
    ("SL002", "allowed-anchors", SL002AllowedAnchors::from_config),
    ("SL003", "ascii-only", SL003AsciiOnly::from_config),
    ("SL004", "no-unicode-arrows", SL004NoUnicodeArrows::from_config),
];

/// Returns all rule instances configured from `config`
pub fn all_rules(config: &Config) -> Vec<Box<dyn Rule>> {
    RULES.iter().map(|(_, _, ctor)| ctor(config)).collect()
}

/// Map a rule code or alias (any case, `_` or `-`) to its code
pub fn canonical_rule_name(name: &str) -> Option<&'static str> {
    let wanted = name.trim().replace('_', "-");
    RULES
        .iter()
        .find(|(code, alias, _)| code.eq_ignore_ascii_case(&wanted) || alias.eq_ignore_ascii_case(&wanted))
        .map(|(code, _, _)| *code)
}

fn rule_set(names: &[String]) -> HashSet<String> {
    names
        .iter()
        .map(|name| {
            if name.eq_ignore_ascii_case("all") {
                "all".to_string()
            } else {
                canonical_rule_name(name).map_or_else(|| name.to_ascii_uppercase(), str::to_string)
            }
        })
        .collect()
}

/// Apply `[global] enable` / `disable` to a rule list.
///
/// `disable = ["all"]` turns everything off unless `enable` names rules.
/// Otherwise a non-empty `enable` restricts to those rules, and `disable`
/// always wins over `enable`.
pub fn filter_rules(rules: &[Box<dyn Rule>], global_config: &GlobalConfig) -> Vec<Box<dyn Rule>> {
    let enabled = rule_set(&global_config.enable);
    let disabled = rule_set(&global_config.disable);

    if disabled.contains("all") {
        return rules
            .iter()
            .filter(|rule| enabled.contains(rule.name()))
            .map(|rule| dyn_clone::clone_box(&**rule))
            .collect();
    }

    rules
        .iter()
        .filter(|rule| enabled.is_empty() || enabled.contains(rule.name()))
        .filter(|rule| !disabled.contains(rule.name()))
        .map(|rule| dyn_clone::clone_box(&**rule))
        .collect()
}
