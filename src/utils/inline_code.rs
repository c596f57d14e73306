//! Inline code span masking.
//!
//! Code spans are blanked character-for-character so pattern checks on the
//! result cannot match text shown as code. Backtick runs are copied through
//! unchanged. A span opened by a run of N backticks is closed only by a run
//! of exactly N; shorter or longer runs inside it are literal content.
//! Spans never continue onto the next line.

/// Replace the contents of every inline code span in `line` with spaces.
///
/// The output has the same number of chars as the input.
pub fn strip_inline_code(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut open_run: Option<usize> = None;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '`' {
            out.push(if open_run.is_some() { ' ' } else { ch });
            continue;
        }

        let mut run = 1;
        while chars.peek() == Some(&'`') {
            chars.next();
            run += 1;
        }

        match open_run {
            None => open_run = Some(run),
            Some(opening) if opening == run => open_run = None,
            Some(_) => {}
        }

        out.extend(std::iter::repeat_n('`', run));
    }

    out
}
