//!
//! This module defines configuration structures, loading, and discovery for speclint.
//! Supports `.speclint.toml` and `speclint.toml`.

use crate::rule::Rule;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file names searched for, in priority order, in each directory
pub const CONFIG_FILE_NAMES: &[&str] = &[".speclint.toml", "speclint.toml"];

/// Normalizes configuration keys (rule names, option names).
///
/// Rule codes become uppercase (`sl001` -> `SL001`); everything else becomes
/// lowercase kebab-case.
pub fn normalize_key(key: &str) -> String {
    if key.len() == 5 && key.to_ascii_lowercase().starts_with("sl") && key[2..].chars().all(|c| c.is_ascii_digit()) {
        key.to_ascii_uppercase()
    } else {
        key.replace('_', "-").to_ascii_lowercase()
    }
}

/// Resolve a rule code or alias to its code; unknown names are normalized only
pub fn normalize_rule_name(name: &str) -> String {
    crate::rules::canonical_rule_name(name).map_or_else(|| normalize_key(name), str::to_string)
}

/// Represents a rule-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RuleConfig {
    #[serde(flatten)]
    pub values: BTreeMap<String, toml::Value>,
}

/// Represents the complete configuration loaded from speclint.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,

    /// Per-file rule ignores: maps file patterns to lists of rules to ignore
    /// Example: { "README.md": ["SL003"], "drafts/**/*.md": ["heading-numbering"] }
    #[serde(default, rename = "per-file-ignores")]
    pub per_file_ignores: HashMap<String, Vec<String>>,

    /// Rule sections keyed by rule code (aliases are resolved on load)
    #[serde(flatten)]
    pub rules: BTreeMap<String, RuleConfig>,
}

impl Config {
    /// Parse configuration from TOML source, resolving rule aliases
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let rules = std::mem::take(&mut config.rules);
        for (name, section) in rules {
            config.rules.entry(normalize_rule_name(&name)).or_default().values.extend(section.values);
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path.display().to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|err| match err {
            ConfigError::ParseError(msg) => ConfigError::ParseError(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Get the set of rules that should be ignored for a specific file based on per-file-ignores configuration
    /// Returns a HashSet of rule codes (e.g., "SL003") that match the given file path
    pub fn get_ignored_rules_for_file(&self, file_path: &Path) -> HashSet<String> {
        use globset::{Glob, GlobSetBuilder};

        let mut ignored_rules = HashSet::new();

        if self.per_file_ignores.is_empty() {
            return ignored_rules;
        }

        let mut builder = GlobSetBuilder::new();
        let mut pattern_rules: Vec<&Vec<String>> = Vec::new();

        for (pattern, rules) in &self.per_file_ignores {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                    pattern_rules.push(rules);
                }
                Err(_) => log::warn!("Invalid glob pattern in per-file-ignores: {pattern}"),
            }
        }

        let globset = match builder.build() {
            Ok(gs) => gs,
            Err(e) => {
                log::error!("Failed to build globset for per-file-ignores: {e}");
                return ignored_rules;
            }
        };

        for match_idx in globset.matches(file_path) {
            if let Some(rules) = pattern_rules.get(match_idx) {
                ignored_rules.extend(rules.iter().map(|rule| normalize_rule_name(rule)));
            }
        }

        ignored_rules
    }

    /// Render as TOML, global options first, then per-file ignores, then rule sections
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let mut root = toml::Table::new();
        let global = toml::Value::try_from(&self.global).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        root.insert("global".to_string(), global);

        if !self.per_file_ignores.is_empty() {
            let ignores: toml::Table = self
                .per_file_ignores
                .iter()
                .map(|(pattern, rules)| {
                    let list = rules.iter().cloned().map(toml::Value::String).collect();
                    (pattern.clone(), toml::Value::Array(list))
                })
                .collect();
            root.insert("per-file-ignores".to_string(), toml::Value::Table(ignores));
        }

        for (name, section) in &self.rules {
            let table: toml::Table = section.values.clone().into_iter().collect();
            root.insert(name.clone(), toml::Value::Table(table));
        }

        toml::to_string(&root).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Fill in every rule's default section without overriding configured keys
    pub fn with_rule_defaults(mut self, rules: &[Box<dyn Rule>]) -> Self {
        for rule in rules {
            if let Some((name, toml::Value::Table(defaults))) = rule.default_config_section() {
                let section = self.rules.entry(name).or_default();
                for (key, value) in defaults {
                    section.values.entry(key).or_insert(value);
                }
            }
        }
        self
    }
}

/// Global configuration options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Enabled rules; when non-empty, only these run
    #[serde(default)]
    pub enable: Vec<String>,

    /// Disabled rules
    #[serde(default)]
    pub disable: Vec<String>,

    /// Files to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Files to include
    #[serde(default)]
    pub include: Vec<String>,

    /// Respect .gitignore files when scanning directories
    #[serde(default = "default_respect_gitignore", alias = "respect_gitignore")]
    pub respect_gitignore: bool,

    /// Output format for linting results ("text", "json" or "github")
    #[serde(skip_serializing_if = "Option::is_none", alias = "output_format")]
    pub output_format: Option<String>,
}

fn default_respect_gitignore() -> bool {
    true
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            enable: Vec::new(),
            disable: Vec::new(),
            exclude: Vec::new(),
            include: Vec::new(),
            respect_gitignore: true,
            output_format: None,
        }
    }
}

/// Find the nearest config file at or above `start`
pub fn discover_config_file(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                log::debug!("Found config file: {}", candidate.display());
                return Some(candidate);
            }
        }
        // Stop at the repository root
        if dir.join(".git").exists() {
            break;
        }
    }
    None
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Otherwise the nearest discovered file is used,
/// or defaults when none is found or `no_config` is set. Returns the path the
/// configuration came from, if any.
pub fn load_config(
    explicit_path: Option<&Path>,
    no_config: bool,
    search_start: &Path,
) -> Result<(Config, Option<PathBuf>), ConfigError> {
    if no_config {
        return Ok((Config::default(), None));
    }

    if let Some(path) = explicit_path {
        return Ok((Config::from_file(path)?, Some(path.to_path_buf())));
    }

    match discover_config_file(search_start) {
        Some(path) => Ok((Config::from_file(&path)?, Some(path))),
        None => Ok((Config::default(), None)),
    }
}

/// Create a default configuration file at the specified path
pub fn create_default_config(path: &str) -> Result<(), ConfigError> {
    if Path::new(path).exists() {
        return Err(ConfigError::FileExists { path: path.to_string() });
    }

    let default_config = r#"# speclint configuration file

[global]
# Rules to disable, by code or alias
# disable = ["SL004"]

# Rules to enable exclusively (if provided, only these rules will run)
# enable = ["SL001", "SL002"]

# File/directory patterns to include (if provided, only these will be linted)
# include = ["docs/**/*.md"]

# File/directory patterns to exclude from linting
exclude = [
    ".git",
    "node_modules",
    "target",
]

# Respect .gitignore files when scanning directories (default: true)
respect-gitignore = true

# Per-file rule ignores
# [per-file-ignores]
# "CHANGELOG.md" = ["ascii-only"]

# [SL001]
# policy = "section"  # Numbering scope: "section" or "document"

# [SL002]
# allowed-id-patterns = ["^spec-[a-z0-9-]+$", "^ref-[a-z0-9]+-[a-z0-9-]+$"]
# strict-placement = true  # Enforce anchor placement by kind

# [SL003]
# allowed-path-patterns-unicode = ["**/README.md"]
# allowed-path-patterns-emoji = ["dev_docs/**"]
# allowed-emoji = ["✅", "❌", "📊", "⚠️"]
"#;

    fs::write(path, default_config).map_err(|source| ConfigError::IoError {
        source,
        path: path.to_string(),
    })
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Configuration file already exists
    #[error("Configuration file already exists at {path}")]
    FileExists { path: String },
}

/// Represents a config validation warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationWarning {
    pub message: String,
    pub rule: Option<String>,
    pub key: Option<String>,
}

/// Report rule sections and option keys no rule recognises
pub fn validate_config(config: &Config, rules: &[Box<dyn Rule>]) -> Vec<ConfigValidationWarning> {
    let known: BTreeMap<String, Vec<String>> = rules
        .iter()
        .map(|rule| {
            let keys = match rule.default_config_section() {
                Some((_, toml::Value::Table(table))) => table.keys().cloned().collect(),
                _ => Vec::new(),
            };
            (rule.name().to_string(), keys)
        })
        .collect();
    let rule_names: Vec<String> = known.keys().cloned().collect();

    let mut warnings = Vec::new();
    for (rule, section) in &config.rules {
        let Some(valid_keys) = known.get(rule) else {
            let mut message = format!("Unknown rule in config: {rule}");
            if let Some(suggestion) = suggest_similar_key(rule, &rule_names) {
                message.push_str(&format!(" (did you mean: {suggestion}?)"));
            }
            warnings.push(ConfigValidationWarning {
                message,
                rule: Some(rule.clone()),
                key: None,
            });
            continue;
        };

        for key in section.values.keys() {
            if valid_keys.contains(&normalize_key(key)) {
                continue;
            }
            let mut message = format!("Unknown option for rule {rule}: {key}");
            if let Some(suggestion) = suggest_similar_key(key, valid_keys) {
                message.push_str(&format!(" (did you mean: {suggestion}?)"));
            }
            warnings.push(ConfigValidationWarning {
                message,
                rule: Some(rule.clone()),
                key: Some(key.clone()),
            });
        }
    }

    for rule in config.global.enable.iter().chain(&config.global.disable) {
        if !rule.eq_ignore_ascii_case("all") && crate::rules::canonical_rule_name(rule).is_none() {
            warnings.push(ConfigValidationWarning {
                message: format!("Unknown rule in global enable/disable: {rule}"),
                rule: Some(rule.clone()),
                key: None,
            });
        }
    }

    warnings
}

fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut curr_row = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = usize::from(c1 != c2);
            curr_row[j + 1] = (prev_row[j + 1] + 1).min(curr_row[j] + 1).min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[s2_chars.len()]
}

fn suggest_similar_key(unknown: &str, valid_keys: &[String]) -> Option<String> {
    let unknown_lower = unknown.to_lowercase();
    let max_distance = 2.max(unknown.len() / 3);

    valid_keys
        .iter()
        .map(|valid| (valid, levenshtein_distance(&unknown_lower, &valid.to_lowercase())))
        .filter(|&(_, distance)| distance <= max_distance)
        .min_by_key(|&(_, distance)| distance)
        .map(|(valid, _)| valid.clone())
}
