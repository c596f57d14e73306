//! Process exit codes

/// Linting finished and found nothing
pub const SUCCESS: i32 = 0;

/// Linting finished and found violations
pub const VIOLATIONS_FOUND: i32 = 1;

/// The tool itself failed (bad config, unreadable input, invalid arguments)
pub const TOOL_ERROR: i32 = 2;

pub mod exit {
    use super::*;

    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    pub fn violations_found() -> ! {
        std::process::exit(VIOLATIONS_FOUND);
    }

    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
