//! Path exemption matching for rule configuration.
//!
//! Patterns use a deliberately small glob dialect: `**` matches any run of
//! characters including `/`, `*` matches within one path segment, and every
//! other character is literal. A leading or inner `**/` also matches zero
//! directories, so `**/README.md` covers a top-level `README.md`. Paths are
//! compared with forward slashes and without a leading `./`.
//!
//! A pattern that does not begin with `/` or `*` also matches when it lines
//! up with a trailing run of whole path segments, so `dev_docs/**` exempts
//! `/repo/dev_docs/notes.md` as well as `dev_docs/notes.md`.

use regex::Regex;

/// Compile a glob pattern to the regex source it stands for (unanchored)
fn glob_to_regex_source(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    source.push_str("(?:.*/)?");
                } else {
                    source.push_str(".*");
                }
            } else {
                source.push_str("[^/]*");
            }
        } else {
            source.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])));
        }
    }

    source
}

/// Normalize separators and strip a leading `./`
fn normalize_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    match normalized.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => normalized,
    }
}

/// One compiled glob pattern
#[derive(Debug, Clone)]
struct PathGlob {
    anchored: Regex,
    /// Trailing-segment match, for relative patterns only
    suffix: Option<Regex>,
}

impl PathGlob {
    fn new(pattern: &str) -> Result<Self, regex::Error> {
        let source = glob_to_regex_source(pattern);
        let anchored = Regex::new(&format!("^{source}$"))?;
        let suffix = if pattern.starts_with('/') || pattern.starts_with('*') {
            None
        } else {
            Some(Regex::new(&format!("(?:^|/){source}$"))?)
        };
        Ok(Self { anchored, suffix })
    }

    /// Whether an already-normalized path matches
    fn matches_normalized(&self, normalized: &str) -> bool {
        self.anchored.is_match(normalized) || self.suffix.as_ref().is_some_and(|re| re.is_match(normalized))
    }
}

/// A compiled list of exemption patterns; invalid ones are dropped with a warning
#[derive(Debug, Clone, Default)]
pub struct PathGlobSet {
    globs: Vec<PathGlob>,
}

impl PathGlobSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let globs = patterns
            .iter()
            .map(AsRef::as_ref)
            .filter(|pattern| !pattern.is_empty())
            .filter_map(|pattern| match PathGlob::new(pattern) {
                Ok(glob) => Some(glob),
                Err(e) => {
                    log::warn!("Invalid path pattern '{pattern}': {e}");
                    None
                }
            })
            .collect();
        Self { globs }
    }

    /// Whether `path` matches any pattern in the set
    pub fn is_match(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let normalized = normalize_path(path);
        self.globs.iter().any(|glob| glob.matches_normalized(&normalized))
    }
}
