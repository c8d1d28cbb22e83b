//! Character-level scan state shared by both passes.
//!
//! The scanner only knows about quotes and backslashes. That is enough to tell
//! whether a `//` or a parenthesis is real code or sits inside a string
//! literal, without tokenizing anything else.

/// String literal delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    pub fn from_char(ch: char) -> Option<Quote> {
        match ch {
            '"' => Some(Quote::Double),
            '\'' => Some(Quote::Single),
            _ => None,
        }
    }
}

/// Where the scan currently is.
///
/// `Escaped` swallows exactly one character and then resumes in the state it
/// was entered from: plain code (`None`) or the string it interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Code,
    InString(Quote),
    Escaped(Option<Quote>),
}

impl ScanState {
    /// Consume one character and return the next state.
    pub fn advance(self, ch: char) -> ScanState {
        match self {
            ScanState::Escaped(None) => ScanState::Code,
            ScanState::Escaped(Some(q)) => ScanState::InString(q),
            ScanState::Code => {
                if ch == '\\' {
                    ScanState::Escaped(None)
                } else if let Some(q) = Quote::from_char(ch) {
                    ScanState::InString(q)
                } else {
                    ScanState::Code
                }
            }
            ScanState::InString(q) => {
                if ch == '\\' {
                    ScanState::Escaped(Some(q))
                } else if Quote::from_char(ch) == Some(q) {
                    ScanState::Code
                } else {
                    ScanState::InString(q)
                }
            }
        }
    }

    /// True when the next character is plain, unescaped code.
    pub fn is_code(self) -> bool {
        self == ScanState::Code
    }

    #[cfg(test)]
    fn in_string(self) -> bool {
        matches!(
            self,
            ScanState::InString(_) | ScanState::Escaped(Some(_))
        )
    }

    /// Fold a whole run of text into the state.
    #[cfg(test)]
    fn advance_str(self, text: &str) -> ScanState {
        text.chars().fold(self, ScanState::advance)
    }
}
