use std::fmt;
use std::io;

use service_builder_core::types::Application;

/// A line/column location in the source text.
///
/// Lines start at 1. Columns count runes consumed on the current line, so
/// the first rune of a line is at column 1 and column 0 means "before any
/// rune on this line".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position before the first rune of the input.
    pub const START: Position = Position { line: 1, column: 0 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position after consuming `ch` from this position.
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self {
                line: self.line + 1,
                column: 0,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Failures reading runes or lexemes, before any grammar is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanError {
    /// The underlying reader failed.
    Io {
        kind: io::ErrorKind,
        message: String,
        position: Position,
    },

    /// The input is not valid UTF-8 at this position.
    InvalidUtf8 { position: Position },

    /// `unread` was called without a preceding `read`, or twice in a row.
    InvalidUnread { position: Position },

    /// The scanning thread stopped without delivering end of input.
    Disconnected,
}

impl ScanError {
    pub(crate) fn io(err: &io::Error, position: Position) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            position,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Io { position, .. }
            | Self::InvalidUtf8 { position }
            | Self::InvalidUnread { position } => Some(*position),
            Self::Disconnected => None,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { message, .. } => write!(f, "read error: {message}"),
            Self::InvalidUtf8 { .. } => write!(f, "input is not valid UTF-8"),
            Self::InvalidUnread { .. } => {
                write!(f, "unread is only valid once, immediately after a read")
            }
            Self::Disconnected => write!(f, "scanning task stopped before end of input"),
        }
    }
}

impl std::error::Error for ScanError {}

/// Errors that occur during DSL parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DslError {
    /// A character that cannot start any token.
    IllegalCharacter { found: String, position: Position },

    /// The parser encountered a token other than the one the grammar requires.
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    /// The input ended inside an incomplete construct.
    UnexpectedEndOfInput { expected: String, position: Position },

    /// A numeric literal that does not fit an integer.
    InvalidInteger { text: String, position: Position },

    /// The scanner failed to deliver the next lexeme.
    Read { source: ScanError },
}

impl DslError {
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::IllegalCharacter { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position, .. }
            | Self::InvalidInteger { position, .. } => Some(*position),
            Self::Read { source } => source.position(),
        }
    }
}

impl fmt::Display for DslError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalCharacter { found, .. } => {
                write!(f, "illegal character '{found}'")
            }
            Self::UnexpectedToken {
                expected, found, ..
            } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::UnexpectedEndOfInput { expected, .. } => {
                write!(f, "unexpected end of input: expected {expected}")
            }
            Self::InvalidInteger { text, .. } => {
                write!(f, "invalid integer '{text}': value out of range")
            }
            Self::Read { source } => write!(f, "{source}"),
        }
    }
}

impl std::error::Error for DslError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ScanError> for DslError {
    fn from(source: ScanError) -> Self {
        Self::Read { source }
    }
}

/// A failed parse of one named source.
///
/// Carries the models that were completed before the failure, so callers
/// can report what did parse alongside the error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    source_name: String,
    error: DslError,
    partial: Application,
}

impl ParseError {
    pub fn new(source_name: impl Into<String>, error: DslError, partial: Application) -> Self {
        Self {
            source_name: source_name.into(),
            error,
            partial,
        }
    }

    /// The name the source was parsed under.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn error(&self) -> &DslError {
        &self.error
    }

    pub fn position(&self) -> Option<Position> {
        self.error.position()
    }

    /// Models completed before the error, in declaration order.
    pub fn partial(&self) -> &Application {
        &self.partial
    }

    pub fn into_partial(self) -> Application {
        self.partial
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error.position() {
            Some(position) => write!(f, "{}:{}: {}", self.source_name, position, self.error),
            None => write!(f, "{}: {}", self.source_name, self.error),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
