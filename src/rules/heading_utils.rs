use crate::lint_context::{ClassifiedLine, classify_lines};
use regex::Regex;
use std::sync::LazyLock;

// 1-6 markers, whitespace, then some visible text
static ATX_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(\S.*)$").unwrap());

// Leading marker and whitespace, stripped before prefix parsing
static HEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#{1,6}\s+").unwrap());

static NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)*)(\.)?(?:\s|$)").unwrap());

/// An ATX heading outside any fenced code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1-based line number
    pub line: usize,
    /// 1..=6
    pub level: usize,
    /// The trimmed heading line, markers included
    pub raw_text: String,
}

impl Heading {
    /// Visible text after the markers
    pub fn text(&self) -> &str {
        match HEADING_MARKER.find(&self.raw_text) {
            Some(m) => &self.raw_text[m.end()..],
            None => &self.raw_text,
        }
    }

    pub fn prefix(&self) -> HeadingPrefix {
        parse_heading_prefix(&self.raw_text)
    }
}

/// Numeric prefix at the start of a heading's text, e.g. `2.3.` in `### 2.3. Layout`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadingPrefix {
    /// Dot-separated digit run, without any trailing period
    pub numbering: Option<String>,
    /// A period directly follows the numbering
    pub has_period: bool,
}

impl HeadingPrefix {
    pub fn is_numbered(&self) -> bool {
        self.numbering.is_some()
    }

    /// Segments of the numbering, empty when unnumbered
    pub fn segments(&self) -> Vec<&str> {
        self.numbering.as_deref().map(|n| n.split('.').collect()).unwrap_or_default()
    }
}

/// Parse the numbering prefix of a heading.
///
/// Accepts the full heading line (markers are stripped first) or bare heading
/// text. A heading titled "2024 Roadmap" parses as numbered `2024`; the
/// convention cannot tell such titles apart from section numbers.
pub fn parse_heading_prefix(raw_heading_text: &str) -> HeadingPrefix {
    let text = match HEADING_MARKER.find(raw_heading_text) {
        Some(m) => &raw_heading_text[m.end()..],
        None => raw_heading_text.trim_start(),
    };

    match NUMBER_PREFIX.captures(text) {
        Some(caps) => HeadingPrefix {
            numbering: caps.get(1).map(|m| m.as_str().to_string()),
            has_period: caps.get(2).is_some(),
        },
        None => HeadingPrefix::default(),
    }
}

/// Parse a trimmed line as a heading, returning its level
pub fn heading_level(trimmed: &str) -> Option<usize> {
    ATX_HEADING.captures(trimmed).and_then(|caps| caps.get(1)).map(|m| m.len())
}

/// Headings from already-classified lines, in line order
pub fn headings_from_classified(lines: &[ClassifiedLine<'_>]) -> Vec<Heading> {
    lines
        .iter()
        .filter(|line| !line.in_fence)
        .filter_map(|line| {
            let trimmed = line.raw.trim();
            heading_level(trimmed).map(|level| Heading {
                line: line.line_number(),
                level,
                raw_text: trimmed.to_string(),
            })
        })
        .collect()
}

/// Extract every non-fenced heading from raw lines
pub fn extract_headings<S: AsRef<str>>(raw_lines: &[S]) -> Vec<Heading> {
    let classified = classify_lines(raw_lines.iter().map(|l| l.as_ref()));
    headings_from_classified(&classified)
}
