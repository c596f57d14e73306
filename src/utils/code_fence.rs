//! Fenced code block tracking for line-oriented scans.
//!
//! A fence opens on a trimmed line starting with three or more backticks or
//! tildes and closes on the next trimmed line starting with a run of the
//! same family. A tilde run never closes a backtick fence and vice versa.

use regex::Regex;
use std::sync::LazyLock;

static FENCE_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:`{3,}|~{3,})").unwrap());

/// The character family a fence was opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceMarker {
    Backtick,
    Tilde,
}

impl FenceMarker {
    /// Detect a fence delimiter at the start of an already-trimmed line
    pub fn detect(trimmed: &str) -> Option<Self> {
        let m = FENCE_START.find(trimmed)?;
        if m.as_str().starts_with('`') {
            Some(Self::Backtick)
        } else {
            Some(Self::Tilde)
        }
    }
}

/// What a single line did to the fence state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceTransition {
    /// Line opened a new fence
    Opened(FenceMarker),
    /// Line closed the currently open fence
    Closed(FenceMarker),
    /// Fence-shaped line of the other family inside an open fence (content)
    Ignored,
    /// Ordinary line
    None,
}

/// Forward-only fence state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FenceTracker {
    open: Option<FenceMarker>,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fence is currently open
    pub fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next raw line and report the transition it caused
    pub fn advance(&mut self, line: &str) -> FenceTransition {
        let Some(marker) = FenceMarker::detect(line.trim()) else {
            return FenceTransition::None;
        };

        match self.open {
            None => {
                self.open = Some(marker);
                FenceTransition::Opened(marker)
            }
            Some(open) if open == marker => {
                self.open = None;
                FenceTransition::Closed(marker)
            }
            Some(_) => FenceTransition::Ignored,
        }
    }
}

/// Whether a trimmed line starts a fenced code block
pub fn is_fence_start(trimmed: &str) -> bool {
    FenceMarker::detect(trimmed).is_some()
}
