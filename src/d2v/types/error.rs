//! Custom error types for the d2v-reader crate.

use std::path::PathBuf;
use thiserror::Error;

/// A violation of the D2V text grammar.
///
/// These are always fatal to the current parse. The reader wraps them in
/// [`D2vError::Format`] together with the line number they were found on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The first line does not start with `DGIndexProjectFile<N>`.
    #[error("expected version header, received '{line}'")]
    BadVersionHeader { line: String },

    /// The line after the version header is not a video count.
    #[error("invalid video count '{line}'")]
    InvalidVideoCount { line: String },

    /// The line after the video list is not empty.
    #[error("unexpected data after the header's video list: '{line}'")]
    UnexpectedHeaderTrailer { line: String },

    /// A settings line has no `=` separator.
    #[error("malformed setting line '{line}'")]
    MalformedSetting { line: String },

    /// A setting value could not be converted to the shape its key requires.
    #[error("invalid value '{value}' for setting {key}")]
    InvalidSettingValue { key: String, value: String },

    /// A frame table field is missing or not a base-10 integer.
    #[error("invalid frame field {field}: '{value}'")]
    InvalidFrameField { field: &'static str, value: String },

    /// An info or flag token is not a single hex byte.
    #[error("invalid hex byte '{token}'")]
    InvalidHexByte { token: String },

    /// Input ended inside a section that needs more lines.
    #[error("unexpected end of input in {section}")]
    UnexpectedEof { section: &'static str },
}

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum D2vError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The path exists but does not point at a regular file.
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The input does not conform to the D2V grammar.
    #[error("line {line}: {source}")]
    Format {
        line: usize,
        #[source]
        source: FormatError,
    },
}

impl D2vError {
    /// Returns the grammar error, if this is one.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            D2vError::Format { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A convenience `Result` type alias using the crate's `D2vError` type.
pub type Result<T> = std::result::Result<T, D2vError>;
