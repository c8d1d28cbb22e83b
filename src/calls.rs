//! Removal of diagnostic-output call statements such as `print("...");`.
//!
//! A statement is removed as whole lines, and only when it is complete: the
//! parentheses opened by the call balance out again. A call that closes on its
//! own line must also end with `;`. Anything else (unbalanced, unterminated,
//! cut off by end of file) is left exactly as it was.

use std::ops::Range;

use crate::scan::ScanState;

pub const DEFAULT_CALL_PREFIX: &str = "print(";
pub const TERMINATOR: char = ';';

/// Removes call statements that start with one of a set of prefixes.
#[derive(Debug, Clone)]
pub struct CallStripper {
    prefixes: Vec<String>,
}

impl Default for CallStripper {
    fn default() -> Self {
        Self {
            prefixes: vec![DEFAULT_CALL_PREFIX.to_string()],
        }
    }
}

impl CallStripper {
    /// Each prefix should end with the opening `(` of the call, so that
    /// `print(` does not also match `printer = 1;`.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    fn is_call_start(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        self.prefixes.iter().any(|p| trimmed.starts_with(p.as_str()))
    }

    /// Remove every complete call statement from `src`.
    pub fn strip(&self, src: &str) -> String {
        let lines: Vec<&str> = src.split('\n').collect();
        let mut out: Vec<&str> = Vec::with_capacity(lines.len());
        let mut cursor = 0;

        while cursor < lines.len() {
            match self.match_statement(&lines, cursor) {
                Some(stmt) => cursor = stmt.end,
                None => {
                    out.push(lines[cursor]);
                    cursor += 1;
                }
            }
        }

        out.join("\n")
    }

    /// If a complete statement starts at `start`, return the lines it covers.
    fn match_statement(&self, lines: &[&str], start: usize) -> Option<Range<usize>> {
        if !self.is_call_start(lines[start]) {
            return None;
        }

        let mut stmt = CandidateStatement::open(start, lines[start].trim());
        loop {
            match stmt.status() {
                Status::Complete => return Some(stmt.lines()),
                Status::Abandoned => return None,
                Status::Open => {
                    let next = lines.get(stmt.end)?;
                    stmt.extend(next);
                }
            }
        }
    }
}

/// Remove `print(...);` statements using the default prefix.
pub fn strip_diagnostic_calls(src: &str) -> String {
    CallStripper::default().strip(src)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Open,
    Complete,
    Abandoned,
}

/// Lines scanned so far for one call statement. Scan state and depth carry
/// over from line to line.
#[derive(Debug)]
struct CandidateStatement {
    start: usize,
    end: usize,
    depth: isize,
    state: ScanState,
    terminated: bool,
}

impl CandidateStatement {
    fn open(start: usize, first: &str) -> Self {
        let mut stmt = Self {
            start,
            end: start,
            depth: 0,
            state: ScanState::Code,
            terminated: false,
        };
        stmt.extend(first);
        stmt
    }

    fn extend(&mut self, line: &str) {
        for ch in line.chars() {
            if self.state.is_code() {
                match ch {
                    '(' => self.depth += 1,
                    ')' => self.depth -= 1,
                    _ => {}
                }
            }
            self.state = self.state.advance(ch);
        }
        self.end += 1;
        self.terminated = line.trim_end().ends_with(TERMINATOR);
    }

    fn lines(&self) -> Range<usize> {
        self.start..self.end
    }

    fn is_multi_line(&self) -> bool {
        self.end - self.start > 1
    }

    /// A single line needs the terminator; once continuation lines were
    /// consumed, closing the last paren is enough.
    fn status(&self) -> Status {
        match self.depth {
            d if d > 0 => Status::Open,
            0 if self.terminated || self.is_multi_line() => Status::Complete,
            _ => Status::Abandoned,
        }
    }
}
