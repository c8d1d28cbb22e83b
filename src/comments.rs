use std::borrow::Cow;

use crate::scan::ScanState;

/// Prefix of documentation lines, which are always kept.
pub const DOC_COMMENT: &str = "///";
/// Line comment marker, both as a line prefix and inline.
pub const LINE_COMMENT: &str = "//";

/// Strip `//` comments while keeping `///` documentation lines.
///
/// - Lines whose first non-whitespace chars are `///` are kept verbatim.
/// - Lines whose first non-whitespace chars are `//` are dropped.
/// - Other lines are cut at the first `//` that is not inside a string
///   literal. If nothing but whitespace is left, the line is dropped.
///
/// String state is tracked per line only; a literal spanning several lines is
/// not followed across the line break.
pub fn strip_comments(src: &str) -> String {
    let mut out: Vec<Cow<'_, str>> = Vec::new();

    for line in src.split('\n') {
        let trimmed = line.trim_start();

        if trimmed.starts_with(DOC_COMMENT) {
            out.push(Cow::Borrowed(line));
            continue;
        }

        if trimmed.starts_with(LINE_COMMENT) {
            continue;
        }

        let Some(pos) = find_comment(line) else {
            out.push(Cow::Borrowed(line));
            continue;
        };

        let code = line[..pos].trim_end();
        if code.is_empty() {
            continue;
        }

        // Keep CRLF endings intact on truncated lines.
        if line.ends_with('\r') {
            out.push(Cow::Owned(format!("{code}\r")));
        } else {
            out.push(Cow::Borrowed(code));
        }
    }

    out.join("\n")
}

/// Byte offset of the first comment marker outside a string literal.
pub fn find_comment(line: &str) -> Option<usize> {
    let mut state = ScanState::Code;

    for (i, ch) in line.char_indices() {
        if state.is_code() && line[i..].starts_with(LINE_COMMENT) {
            return Some(i);
        }
        state = state.advance(ch);
    }

    None
}
