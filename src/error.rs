//! Error types for registry export parsing.
//!
//! Component parsers report a bare [`ErrorKind`]. The line driver in
//! [`crate::parser`] attaches the source name, line number and line text
//! before handing a [`RegistryError`] back to the caller.

use std::io;
use thiserror::Error;

/// Result type alias for registry export operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Result type alias for the line-level components, which do not know
/// where in the file they are.
pub type ParseResult<T> = std::result::Result<T, ErrorKind>;

/// Errors that can occur while reading or parsing a `.reg` export.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// I/O error occurred while reading the export file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The export text is malformed.
    #[error("{file}:{line}: {kind} (at {text:?})")]
    Parse {
        /// Name of the source (usually the file path).
        file: String,
        /// 1-based line number where the failure was detected.
        line: usize,
        /// The offending line, trimmed.
        text: String,
        /// Underlying cause.
        #[source]
        kind: ErrorKind,
    },
}

impl RegistryError {
    /// Wraps a component error with its location in the source.
    ///
    /// # Arguments
    ///
    /// * `file` - Source name for display
    /// * `line` - 1-based line number
    /// * `text` - Raw line text, trimmed before storing
    /// * `kind` - The underlying cause
    pub fn at(file: &str, line: usize, text: &str, kind: ErrorKind) -> Self {
        Self::Parse {
            file: file.to_string(),
            line,
            text: text.trim().to_string(),
            kind,
        }
    }

    /// Returns the underlying parse cause, if this is a parse error.
    pub fn kind(&self) -> Option<&ErrorKind> {
        match self {
            Self::Parse { kind, .. } => Some(kind),
            Self::Io(_) => None,
        }
    }

    /// Returns the 1-based line number of a parse error.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}

/// The specific reason a line could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or incorrect format banner.
    #[error("invalid header: expected {expected:?}")]
    Header {
        /// The banner that was required.
        expected: &'static str,
    },

    /// The first key header is malformed.
    #[error("expected a key header such as [HKEY_LOCAL_MACHINE\\Path]")]
    KeyParse,

    /// Value name is not a properly quoted literal.
    #[error("invalid value name: {0}")]
    ValueName(String),

    /// Missing type separator or malformed DWORD text.
    #[error("invalid value data: {0}")]
    DataType(String),

    /// Unrecognized type prefix before `:`.
    #[error("unknown value type {0:?}")]
    UnknownType(String),

    /// Malformed hex byte token, bad UTF-16 terminator or odd byte count.
    #[error("invalid binary data: {0}")]
    BinaryParse(String),

    /// Invalid escape sequence in a string literal.
    #[error("invalid escape sequence: {0}")]
    Escape(String),

    /// String continuation not properly closed.
    #[error("string continuation must end with a closing quote")]
    Continuation,

    /// Input ends mid-value or before any key.
    #[error("unexpected end of file")]
    UnexpectedEndOfFile,

    /// Internal invariant violation.
    #[error("internal parser state error: {0}")]
    BadState(String),
}

impl ErrorKind {
    /// Creates a binary parse error with a formatted message.
    pub fn binary(message: impl Into<String>) -> Self {
        Self::BinaryParse(message.into())
    }

    /// Creates a data type error with a formatted message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use reg_export::error::ErrorKind;
    /// let err = ErrorKind::data_type(format!("missing ':' in {:?}", "dword0"));
    /// assert!(matches!(err, ErrorKind::DataType(_)));
    /// ```
    pub fn data_type(message: impl Into<String>) -> Self {
        Self::DataType(message.into())
    }
}
