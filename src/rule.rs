//! Rule trait and the records rules produce.

use crate::lint_context::LintContext;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LintError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type LintResult = Result<Vec<LintWarning>, LintError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A structural problem found by one of the core validators.
///
/// `line` is 1-based; `context` is the offending raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub line: usize,
    pub detail: String,
    pub context: String,
}

impl Violation {
    pub fn new(line: usize, detail: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            line,
            detail: detail.into(),
            context: context.into(),
        }
    }

    /// Attach rule identity to turn this into a reportable warning
    pub fn into_warning(self, rule_name: &str, severity: Severity) -> LintWarning {
        LintWarning {
            rule_name: Some(rule_name.to_string()),
            line: self.line,
            column: 1,
            message: self.detail,
            context: self.context,
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintWarning {
    pub rule_name: Option<String>,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub context: String,
    pub severity: Severity,
}

pub trait Rule: DynClone + Send + Sync {
    /// Stable rule code, e.g. "SL001"
    fn name(&self) -> &'static str;

    /// markdownlint-style alias, e.g. "heading-numbering"
    fn alias(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn check(&self, ctx: &LintContext) -> LintResult;

    /// Cheap pre-check; rules return true when the document cannot trigger them
    fn should_skip(&self, _ctx: &LintContext) -> bool {
        false
    }

    fn from_config(config: &crate::config::Config) -> Box<dyn Rule>
    where
        Self: Sized;

    /// Default config table for this rule, keyed by rule name
    fn default_config_section(&self) -> Option<(String, toml::Value)> {
        None
    }
}

dyn_clone::clone_trait_object!(Rule);
