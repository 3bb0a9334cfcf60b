//! Error types shared across the lexer, parser and generator.
//!
//! None of these carry a source `Backtrace` or wrap a lower-level error —
//! lexing is total (see [`LexError`]) and the parser/generator fail with a
//! single diagnostic: the first fault aborts the pass.

use std::fmt;

/// Lexing never fails: every line is classified as *something*, worst case
/// `TEXT`. This type exists only so the pipeline stages share a uniform
/// `Result` shape; it is never constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl std::error::Error for LexError {}

/// A malformed document: missing fence, inconsistent table width, metadata
/// with nothing to attach to, and the like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at {}:{}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// A document-tree construct the generator cannot render: an unresolved
/// `include::`/`ifdef`, an unknown template name, passthrough content with
/// `allowRawPassthrough` disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenError {
    pub line: usize,
    pub message: String,
}

impl GenError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "generation error at line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for GenError {}

/// Unifies the pipeline's failure modes for the CLI boundary (exit code 1,
/// single diagnostic line on stderr).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeandocError {
    Parse(ParseError),
    Gen(GenError),
}

impl fmt::Display for LeandocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeandocError::Parse(e) => write!(f, "{e}"),
            LeandocError::Gen(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LeandocError {}

impl From<ParseError> for LeandocError {
    fn from(e: ParseError) -> Self {
        LeandocError::Parse(e)
    }
}

impl From<GenError> for LeandocError {
    fn from(e: GenError) -> Self {
        LeandocError::Gen(e)
    }
}
