//! File discovery and per-file linting for the CLI

use anyhow::{Context, Result, bail};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use itertools::Itertools;
use speclint_lib::config::Config;
use speclint_lib::output::FileResult;
use speclint_lib::rule::{LintWarning, Rule};
use speclint_lib::rules::canonical_rule_name;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdx", "mkd", "mkdn", "mdown", "mdwn"];

/// Expands directory-style patterns to also match files within them.
///
/// Pattern "dir/path" becomes ["dir/path", "dir/path/**"]. Patterns containing
/// glob characters (*, ?, [) are returned unchanged.
fn expand_directory_pattern(pattern: &str) -> Vec<String> {
    if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
        return vec![pattern.to_string()];
    }

    let base = pattern.trim_end_matches('/');
    vec![base.to_string(), format!("{base}/**")]
}

/// Split a comma-separated CLI list, dropping empty entries
fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve CLI rule names to codes, warning about unknown ones
fn cli_rule_set(value: Option<&str>, flag: &str) -> Option<HashSet<&'static str>> {
    value?;
    let mut set = HashSet::new();
    for name in split_list(value) {
        match canonical_rule_name(&name) {
            Some(code) => {
                set.insert(code);
            }
            None => eprintln!("warning: unknown rule '{name}' in {flag}"),
        }
    }
    Some(set)
}

/// The rules to run: config `[global]` enable/disable, then CLI flags.
///
/// CLI `--enable` replaces the configured selection; CLI `--disable` removes
/// rules from whatever remains.
pub fn get_enabled_rules_from_checkargs(args: &crate::CheckArgs, config: &Config) -> Vec<Box<dyn Rule>> {
    let all_rules = speclint_lib::rules::all_rules(config);

    let mut rules = match cli_rule_set(args.enable.as_deref(), "--enable") {
        Some(enabled) => all_rules
            .into_iter()
            .filter(|rule| enabled.contains(rule.name()))
            .collect(),
        None => speclint_lib::rules::filter_rules(&all_rules, &config.global),
    };

    if let Some(disabled) = cli_rule_set(args.disable.as_deref(), "--disable") {
        rules.retain(|rule| !disabled.contains(rule.name()));
    }

    log::debug!("Enabled rules: {}", rules.iter().map(|rule| rule.name()).join(", "));
    rules
}

fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.iter().any(|m| m.eq_ignore_ascii_case(ext)))
}

fn clean_path(path: &str) -> String {
    path.strip_prefix("./").unwrap_or(path).to_string()
}

/// First exclude pattern matching `path`, if any
fn matching_exclude<'a>(path: &str, patterns: &'a [String]) -> Option<&'a str> {
    patterns.iter().map(String::as_str).find(|pattern| match globset::Glob::new(pattern) {
        Ok(glob) => glob.compile_matcher().is_match(path),
        Err(e) => {
            log::warn!("Invalid exclude pattern '{pattern}': {e}");
            false
        }
    })
}

/// Collect the markdown files to lint, sorted and deduplicated.
///
/// Explicitly named files are always linted unless an exclude pattern matches
/// them; directories are walked with gitignore handling and include/exclude
/// overrides.
pub fn find_markdown_files(paths: &[String], args: &crate::CheckArgs, config: &Config) -> Result<Vec<String>> {
    let is_discovery_mode = paths.is_empty() || paths == ["."];

    let include_patterns: Vec<String> = if args.include.is_some() {
        split_list(args.include.as_deref())
    } else if is_discovery_mode {
        config.global.include.clone()
    } else {
        Vec::new()
    };

    let exclude_patterns: Vec<String> = if args.no_exclude {
        Vec::new()
    } else if args.exclude.is_some() {
        split_list(args.exclude.as_deref())
            .iter()
            .flat_map(|p| expand_directory_pattern(p))
            .collect()
    } else {
        config
            .global
            .exclude
            .iter()
            .flat_map(|p| expand_directory_pattern(p))
            .collect()
    };
    log::debug!("Include patterns: {include_patterns:?}");
    log::debug!("Exclude patterns: {exclude_patterns:?}");

    let mut file_paths = Vec::new();
    let mut walk_roots = Vec::new();

    for path_str in paths {
        let path = Path::new(path_str);
        if !path.exists() {
            bail!("File not found: {path_str}");
        }
        if path.is_file() {
            let cleaned = clean_path(path_str);
            if let Some(pattern) = matching_exclude(&cleaned, &exclude_patterns) {
                eprintln!("warning: {cleaned} ignored because of exclude pattern '{pattern}'. Use --no-exclude to override");
            } else {
                file_paths.push(cleaned);
            }
        } else {
            walk_roots.push(path_str.clone());
        }
    }

    if paths.is_empty() {
        walk_roots.push(".".to_string());
    }

    if let Some((first, rest)) = walk_roots.split_first() {
        let mut walk_builder = WalkBuilder::new(first);
        for root in rest {
            walk_builder.add(root);
        }

        let mut types_builder = ignore::types::TypesBuilder::new();
        for ext in MARKDOWN_EXTENSIONS {
            types_builder.add("markdown", &format!("*.{ext}"))?;
        }
        types_builder.select("markdown");
        walk_builder.types(types_builder.build()?);

        if !include_patterns.is_empty() || !exclude_patterns.is_empty() {
            let mut override_builder = OverrideBuilder::new(".");
            for pattern in &include_patterns {
                if let Err(e) = override_builder.add(pattern) {
                    log::warn!("Invalid include pattern '{pattern}': {e}");
                }
            }
            for pattern in &exclude_patterns {
                let exclude_rule = if pattern.starts_with('!') {
                    pattern.clone()
                } else {
                    format!("!{pattern}")
                };
                if let Err(e) = override_builder.add(&exclude_rule) {
                    log::warn!("Invalid exclude pattern '{pattern}': {e}");
                }
            }
            walk_builder.overrides(override_builder.build().context("building path overrides")?);
        }

        let use_gitignore = args.respect_gitignore && config.global.respect_gitignore;
        walk_builder
            .ignore(use_gitignore)
            .git_ignore(use_gitignore)
            .git_global(use_gitignore)
            .git_exclude(use_gitignore)
            .parents(use_gitignore)
            .hidden(false)
            .require_git(false)
            .add_custom_ignore_filename(".speclintignore");

        for result in walk_builder.build() {
            match result {
                Ok(entry) if entry.path().is_file() => {
                    file_paths.push(clean_path(&entry.path().to_string_lossy()));
                }
                Ok(_) => {}
                Err(err) => eprintln!("Error walking directory: {err}"),
            }
        }

        // Overrides are rooted at the cwd; re-check walked paths against excludes
        file_paths.retain(|path| matching_exclude(path, &exclude_patterns).is_none());
    }

    file_paths.retain(|path| has_markdown_extension(Path::new(path)) || args.include.is_some());
    file_paths.sort();
    file_paths.dedup();
    Ok(file_paths)
}

/// Lint one file with the rules that apply to it after per-file ignores
pub fn process_file(path: &str, rules: &[Box<dyn Rule>], config: &Config) -> Result<Vec<LintWarning>> {
    let start = Instant::now();
    let file_rules = speclint_lib::rules_for_file(rules, config, Path::new(path));
    let warnings =
        speclint_lib::lint_file(Path::new(path), &file_rules).with_context(|| format!("Failed to lint {path}"))?;
    log::debug!("Linted {path} in {:?} ({} warnings)", start.elapsed(), warnings.len());
    Ok(warnings)
}

/// Lint every file, keeping the input order in the results
pub fn process_files(files: &[String], rules: &[Box<dyn Rule>], config: &Config) -> Result<Vec<FileResult>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        files
            .par_iter()
            .map(|path| {
                process_file(path, rules, config).map(|warnings| FileResult {
                    path: path.clone(),
                    warnings,
                })
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        files
            .iter()
            .map(|path| {
                process_file(path, rules, config).map(|warnings| FileResult {
                    path: path.clone(),
                    warnings,
                })
            })
            .collect()
    }
}

/// Lint content read from stdin, reported under `filename` (default `<stdin>`)
pub fn process_stdin(filename: Option<&str>, rules: &[Box<dyn Rule>], config: &Config) -> Result<FileResult> {
    use std::io::Read;

    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    let display_name = filename.unwrap_or("<stdin>").to_string();
    let file_rules = match filename {
        Some(name) => speclint_lib::rules_for_file(rules, config, Path::new(name)),
        None => rules.to_vec(),
    };
    let warnings = speclint_lib::lint(&content, &file_rules, filename.map(Into::into))
        .context("Failed to lint stdin")?;

    Ok(FileResult {
        path: display_name,
        warnings,
    })
}
