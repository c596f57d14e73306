pub mod config;
pub mod exit_codes;
pub mod inline_config;
pub mod lint_context;
pub mod output;
pub mod rule;
pub mod rule_config_serde;
pub mod rules;
pub mod utils;

pub use rules::heading_utils::{Heading, HeadingPrefix, extract_headings, parse_heading_prefix};
pub use rules::*;

pub use crate::lint_context::{ClassifiedLine, LintContext, classify_lines};
use crate::rule::{LintError, LintResult, LintWarning, Rule};
use std::path::Path;
use std::time::Instant;

/// Lint a document against the given rules.
///
/// Assumes `rules` is the final, configured and filtered set. Warnings for
/// rules switched off by inline comments are dropped; the rest come back in
/// ascending line order, stable within a line.
pub fn lint(content: &str, rules: &[Box<dyn Rule>], source_file: Option<std::path::PathBuf>) -> LintResult {
    let mut warnings: Vec<LintWarning> = Vec::new();

    if content.is_empty() {
        return Ok(warnings);
    }

    let overall_start = Instant::now();
    let inline_config = crate::inline_config::InlineConfig::from_content(content);
    let lint_ctx = LintContext::new(content, source_file);

    let applicable_rules: Vec<_> = rules.iter().filter(|rule| !rule.should_skip(&lint_ctx)).collect();
    let skipped = rules.len() - applicable_rules.len();
    if skipped > 0 {
        log::debug!("Skipped {skipped} of {} rules based on content analysis", rules.len());
    }

    for rule in applicable_rules {
        let rule_start = Instant::now();

        match rule.check(&lint_ctx) {
            Ok(rule_warnings) => {
                warnings.extend(rule_warnings.into_iter().filter(|warning| {
                    let rule_name = warning.rule_name.as_deref().unwrap_or(rule.name());
                    !inline_config.is_rule_disabled(rule_name, warning.line)
                }));
            }
            Err(e) => {
                log::error!("Error checking rule {}: {}", rule.name(), e);
                return Err(e);
            }
        }

        log::trace!("Rule {} took {:?}", rule.name(), rule_start.elapsed());
    }

    warnings.sort_by_key(|w| w.line);
    log::debug!("Linted {} lines in {:?}", lint_ctx.lines.len(), overall_start.elapsed());
    Ok(warnings)
}

/// Rules that apply to `path` once `[per-file-ignores]` is taken into account
pub fn rules_for_file(rules: &[Box<dyn Rule>], config: &config::Config, path: &Path) -> Vec<Box<dyn Rule>> {
    let ignored = config.get_ignored_rules_for_file(path);
    if !ignored.is_empty() {
        log::debug!("Ignoring {ignored:?} for {}", path.display());
    }
    rules
        .iter()
        .filter(|rule| !ignored.contains(rule.name()))
        .map(|rule| dyn_clone::clone_box(&**rule))
        .collect()
}

/// Read and lint one file
pub fn lint_file(path: &Path, rules: &[Box<dyn Rule>]) -> LintResult {
    let content = std::fs::read_to_string(path).map_err(LintError::IoError)?;
    lint(&content, rules, Some(path.to_path_buf()))
}
