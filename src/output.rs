//! Rendering lint results for terminals, tools and CI

use crate::rule::LintWarning;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Github,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "github" => Ok(Self::Github),
            other => Err(format!("Unknown output format '{other}' (expected text, json or github)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Github => write!(f, "github"),
        }
    }
}

/// Warnings for one linted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub path: String,
    pub warnings: Vec<LintWarning>,
}

#[derive(Serialize)]
struct JsonWarning<'a> {
    file: &'a str,
    line: usize,
    column: usize,
    rule: &'a str,
    message: &'a str,
    context: &'a str,
    severity: String,
}

/// Render warnings in `format`. Files come out in the order given.
pub fn render(results: &[FileResult], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(results),
        OutputFormat::Json => render_json(results),
        OutputFormat::Github => render_github(results),
    }
}

fn render_text(results: &[FileResult]) -> String {
    let mut output = String::new();
    for result in results {
        for warning in &result.warnings {
            output.push_str(&format!(
                "{}:{}:{}: {} {}\n",
                result.path.blue().underline(),
                warning.line.to_string().cyan(),
                warning.column.to_string().cyan(),
                format!("[{}]", warning.rule_name.as_deref().unwrap_or("unknown")).yellow(),
                warning.message
            ));
        }
    }
    output
}

fn render_json(results: &[FileResult]) -> String {
    let records: Vec<JsonWarning<'_>> = results
        .iter()
        .flat_map(|result| {
            result.warnings.iter().map(move |w| JsonWarning {
                file: &result.path,
                line: w.line,
                column: w.column,
                rule: w.rule_name.as_deref().unwrap_or("unknown"),
                message: &w.message,
                context: &w.context,
                severity: w.severity.to_string(),
            })
        })
        .collect();

    serde_json::to_string_pretty(&records).unwrap_or_else(|_| "[]".to_string())
}

/// Escape a value for a GitHub Actions workflow command
fn escape_github(value: &str, property: bool) -> String {
    let escaped = value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A");
    if property {
        escaped.replace(':', "%3A").replace(',', "%2C")
    } else {
        escaped
    }
}

fn render_github(results: &[FileResult]) -> String {
    let mut output = String::new();
    for result in results {
        for warning in &result.warnings {
            let rule = warning.rule_name.as_deref().unwrap_or("unknown");
            output.push_str(&format!(
                "::{} file={},line={},col={},title={}::{}\n",
                warning.severity,
                escape_github(&result.path, true),
                warning.line,
                warning.column,
                escape_github(rule, true),
                escape_github(&warning.message, false)
            ));
        }
    }
    output
}

/// One-line summary for text output
pub fn summary(total_warnings: usize, files_with_issues: usize, files_checked: usize) -> String {
    if total_warnings == 0 {
        format!(
            "{} No issues found in {} file{}",
            "Success:".green().bold(),
            files_checked,
            if files_checked == 1 { "" } else { "s" }
        )
    } else {
        format!(
            "{} Found {} issue{} in {} file{} ({} file{} checked)",
            "Issues:".yellow().bold(),
            total_warnings,
            if total_warnings == 1 { "" } else { "s" },
            files_with_issues,
            if files_with_issues == 1 { "" } else { "s" },
            files_checked,
            if files_checked == 1 { "" } else { "s" }
        )
    }
}
