//!
//! Shared helpers for line-oriented scanning: fence tracking, inline code
//! masking, path exemptions and the handful of line shapes several rules
//! need to recognize.

pub mod code_fence;
pub mod inline_code;
pub mod path_glob;

use regex::Regex;
use std::sync::LazyLock;

pub use code_fence::{FenceMarker, FenceTracker, FenceTransition, is_fence_start};
pub use inline_code::strip_inline_code;
pub use path_glob::PathGlobSet;

// Ordered (`1.` / `1)`) or unordered (`-`, `*`, `+`) list item start
static LIST_ITEM_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]\s+|\d+[.)]\s+)").unwrap());

// A heading naming a code symbol, e.g. "### `Pack()` Algorithm"
static ALGORITHM_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#{1,6}\s+.*`[^`]+`.*\bAlgorithm\b").unwrap());

/// Whether a line starts an ordered or unordered list item
pub fn is_list_item_start(line: &str) -> bool {
    LIST_ITEM_START.is_match(line)
}

/// Whether a line is a heading that opens an Algorithm section
pub fn is_algorithm_heading(line: &str) -> bool {
    ALGORITHM_HEADING.is_match(line.trim())
}

/// Whether a line is empty or whitespace only
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
