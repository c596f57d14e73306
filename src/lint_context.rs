use crate::rules::heading_utils::{self, Heading};
use crate::utils::{FenceTracker, FenceTransition, strip_inline_code};
use std::path::PathBuf;

/// Pre-computed facts about one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// 0-based position in the document
    pub index: usize,
    /// The line exactly as supplied
    pub raw: &'a str,
    /// Inside a fenced code block, delimiter lines included
    pub in_fence: bool,
    /// `raw` with inline code span contents blanked out
    pub scan_text: String,
}

impl ClassifiedLine<'_> {
    /// 1-based line number
    pub fn line_number(&self) -> usize {
        self.index + 1
    }

    /// Whether pattern-based checks should look at this line
    pub fn is_scannable(&self) -> bool {
        !self.in_fence
    }
}

/// Classify raw lines in one forward pass.
///
/// Fence state carries across lines; inline code masking never does.
pub fn classify_lines<'a, I>(raw_lines: I) -> Vec<ClassifiedLine<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tracker = FenceTracker::new();

    raw_lines
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let was_in_fence = tracker.in_fence();
            let in_fence = match tracker.advance(raw) {
                FenceTransition::None => was_in_fence,
                _ => true,
            };

            ClassifiedLine {
                index,
                raw,
                in_fence,
                scan_text: strip_inline_code(raw),
            }
        })
        .collect()
}

/// Everything a rule needs to know about one document, computed once
#[derive(Debug, Clone)]
pub struct LintContext<'a> {
    pub content: &'a str,
    pub lines: Vec<ClassifiedLine<'a>>,
    pub headings: Vec<Heading>,
    pub source_file: Option<PathBuf>,
    raw_lines: Vec<&'a str>,
}

impl<'a> LintContext<'a> {
    pub fn new(content: &'a str, source_file: Option<PathBuf>) -> Self {
        let raw_lines: Vec<&'a str> = content.lines().collect();
        let lines = classify_lines(raw_lines.iter().copied());
        let headings = heading_utils::headings_from_classified(&lines);

        Self {
            content,
            lines,
            headings,
            source_file,
            raw_lines,
        }
    }

    /// Raw text of every line, in order
    pub fn raw_lines(&self) -> &[&'a str] {
        &self.raw_lines
    }

    /// The source path as a forward-slash string, if known
    pub fn source_path_str(&self) -> Option<String> {
        self.source_file.as_ref().map(|p| p.to_string_lossy().replace('\\', "/"))
    }

    pub fn has_headings(&self) -> bool {
        !self.headings.is_empty()
    }

    /// Whether any scannable line mentions an HTML anchor opener
    pub fn likely_has_anchors(&self) -> bool {
        self.content.contains("<a")
    }

    pub fn has_non_ascii(&self) -> bool {
        !self.content.is_ascii()
    }
}
