use crate::rule::{LintResult, LintWarning, Rule, Severity};
use crate::rule_config_serde::RuleConfig;
use crate::utils::PathGlobSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SL003Config {
    /// Files that may contain any non-ASCII text
    #[serde(default = "default_unicode_paths")]
    pub allowed_path_patterns_unicode: Vec<String>,
    /// Files that may contain the allowed emoji but nothing else non-ASCII
    #[serde(default = "default_emoji_paths")]
    pub allowed_path_patterns_emoji: Vec<String>,
    #[serde(default = "default_allowed_emoji")]
    pub allowed_emoji: Vec<String>,
}

fn default_unicode_paths() -> Vec<String> {
    vec!["**/README.md".to_string()]
}

fn default_emoji_paths() -> Vec<String> {
    vec!["dev_docs/**".to_string()]
}

fn default_allowed_emoji() -> Vec<String> {
    ["✅", "❌", "📊", "⚠️"].iter().map(|e| e.to_string()).collect()
}

impl Default for SL003Config {
    fn default() -> Self {
        Self {
            allowed_path_patterns_unicode: default_unicode_paths(),
            allowed_path_patterns_emoji: default_emoji_paths(),
            allowed_emoji: default_allowed_emoji(),
        }
    }
}

impl RuleConfig for SL003Config {
    const RULE_NAME: &'static str = "SL003";
}

/// What a file's path permits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Allowance {
    AsciiOnly,
    EmojiOnly,
    Anything,
}

#[derive(Clone)]
pub struct SL003AsciiOnly {
    config: SL003Config,
    /// Every char of every allowed emoji, so variation selectors pass with their base
    allowed_chars: HashSet<char>,
    unicode_paths: PathGlobSet,
    emoji_paths: PathGlobSet,
}

impl SL003AsciiOnly {
    pub fn new() -> Self {
        Self::from_config_struct(SL003Config::default())
    }

    pub fn from_config_struct(config: SL003Config) -> Self {
        let allowed_chars = config.allowed_emoji.iter().flat_map(|e| e.chars()).collect();
        let unicode_paths = PathGlobSet::new(&config.allowed_path_patterns_unicode);
        let emoji_paths = PathGlobSet::new(&config.allowed_path_patterns_emoji);
        Self {
            config,
            allowed_chars,
            unicode_paths,
            emoji_paths,
        }
    }

    fn allowance_for(&self, path: Option<&str>) -> Allowance {
        let Some(path) = path else {
            return Allowance::AsciiOnly;
        };
        if self.unicode_paths.is_match(path) {
            Allowance::Anything
        } else if self.emoji_paths.is_match(path) {
            Allowance::EmojiOnly
        } else {
            Allowance::AsciiOnly
        }
    }
}

impl Default for SL003AsciiOnly {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for SL003AsciiOnly {
    fn name(&self) -> &'static str {
        "SL003"
    }

    fn alias(&self) -> &'static str {
        "ascii-only"
    }

    fn description(&self) -> &'static str {
        "Non-ASCII text is only allowed in configured paths"
    }

    fn should_skip(&self, ctx: &crate::lint_context::LintContext) -> bool {
        !ctx.has_non_ascii()
    }

    fn check(&self, ctx: &crate::lint_context::LintContext) -> LintResult {
        let path = ctx.source_path_str();
        let allowance = self.allowance_for(path.as_deref());
        if allowance == Allowance::Anything {
            return Ok(Vec::new());
        }

        let mut warnings = Vec::new();
        for line in ctx.lines.iter().filter(|l| l.is_scannable()) {
            let offending = line.scan_text.chars().position(|c| {
                !c.is_ascii() && (allowance == Allowance::AsciiOnly || !self.allowed_chars.contains(&c))
            });
            let Some(position) = offending else {
                continue;
            };

            let message = match allowance {
                Allowance::EmojiOnly => format!(
                    "Non-ASCII only allowed here: {}. Use ASCII or remove.",
                    self.config.allowed_emoji.join(", ")
                ),
                _ => "Non-ASCII characters are not allowed. Use ASCII only.".to_string(),
            };

            warnings.push(LintWarning {
                rule_name: Some(self.name().to_string()),
                line: line.line_number(),
                column: position + 1,
                message,
                context: line.raw.to_string(),
                severity: Severity::Error,
            });
        }

        Ok(warnings)
    }

    fn from_config(config: &crate::config::Config) -> Box<dyn Rule>
    where
        Self: Sized,
    {
        let rule_config = crate::rule_config_serde::load_rule_config::<SL003Config>(config);
        Box::new(Self::from_config_struct(rule_config))
    }

    fn default_config_section(&self) -> Option<(String, toml::Value)> {
        crate::rule_config_serde::default_section::<SL003Config>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint_context::LintContext;
    use std::path::PathBuf;

    fn check_at(content: &str, path: Option<&str>) -> Vec<LintWarning> {
        let ctx = LintContext::new(content, path.map(PathBuf::from));
        SL003AsciiOnly::new().check(&ctx).unwrap()
    }

    #[test]
    fn test_ascii_document_passes() {
        assert!(check_at("# Title\n\nPlain text.\n", Some("docs/a.md")).is_empty());
    }

    #[test]
    fn test_non_ascii_reported_with_column() {
        let warnings = check_at("ok\ncafé\n", Some("docs/a.md"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, 2);
        assert_eq!(warnings[0].column, 4);
        assert_eq!(warnings[0].message, "Non-ASCII characters are not allowed. Use ASCII only.");
    }

    #[test]
    fn test_code_is_ignored() {
        let content = "Use `→` here\n```\nλ\n```\n";
        assert!(check_at(content, Some("docs/a.md")).is_empty());
    }

    #[test]
    fn test_readme_may_use_unicode() {
        assert!(check_at("naïve\n", Some("docs/README.md")).is_empty());
    }

    #[test]
    fn test_top_level_readme_may_use_unicode() {
        assert!(check_at("naïve café\n", Some("README.md")).is_empty());
        assert!(check_at("naïve café\n", Some("./README.md")).is_empty());
    }

    #[test]
    fn test_emoji_paths() {
        assert!(check_at("Done ✅ and ⚠️\n", Some("dev_docs/status.md")).is_empty());
        let warnings = check_at("Done 🎉\n", Some("/repo/dev_docs/status.md"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("Non-ASCII only allowed here: ✅, ❌"));
    }

    #[test]
    fn test_no_path_never_exempt() {
        assert_eq!(check_at("naïve\n", None).len(), 1);
    }
}
