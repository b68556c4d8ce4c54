use std::num::ParseIntError;
use std::path::PathBuf;

/// Errors produced while loading files, reading typed values, or writing
/// to the process environment.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input stream could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dotenv file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dotenv input was not valid UTF-8.
    #[error("invalid UTF-8 input: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// A dotenv input contained a malformed line.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A dotenv file contained a malformed line.
    #[error("malformed dotenv file {}: {source}", .path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// A key requested through `must_get` is unset or empty.
    #[error("environment key `{0}` is not set")]
    NotPresent(String),

    /// A value did not parse as the requested integer type.
    #[error("key `{key}` holds `{value}`, which is not a valid integer: {source}")]
    IntFormat {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// A value did not parse as a duration literal.
    #[error("key `{key}` holds `{value}`, which is not a valid duration: {reason}")]
    DurationFormat {
        key: String,
        value: String,
        reason: &'static str,
    },

    /// A key or value cannot be represented in the process environment.
    #[error("cannot export `{key}`: {reason}")]
    InvalidVar { key: String, reason: &'static str },
}

/// A malformed line in dotenv input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("parse error at line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number of the offending line.
    pub line: u32,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// A non-blank, non-comment line had no `=` or `:` separator.
    #[error("missing `=` or `:` separator")]
    MissingSeparator,
    /// Nothing but whitespace preceded the separator.
    #[error("missing key before separator")]
    MissingKey,
}
