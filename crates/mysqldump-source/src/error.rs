//! Error types for dump parsing.

use std::num::ParseIntError;
use thiserror::Error;

/// Errors raised while splitting a `VALUES (...)` list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueListError {
    /// A quoted field has no closing quote before the end of the list.
    #[error("unterminated quoted value starting at byte {position}")]
    UnterminatedQuote { position: usize },

    /// The byte after a closing quote is not a field separator and splits a character.
    #[error("malformed value separator at byte {position}")]
    InvalidSeparator { position: usize },
}

/// Fatal errors that abort [`parse`](crate::parse).
///
/// `E` is the handler's own error type; a handler failure is returned as-is
/// inside [`ParseError::Handler`].
#[derive(Debug, Error)]
pub enum ParseError<E> {
    /// Reading from the underlying stream failed.
    #[error("failed to read dump stream: {0}")]
    Io(#[from] std::io::Error),

    /// A name or value list captured from a recognized line is not valid UTF-8.
    #[error("captured text on line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    /// The `MASTER_LOG_POS` digits do not fit an unsigned 64-bit integer.
    #[error("invalid binlog position '{value}' on line {line}: {source}")]
    InvalidBinlogPosition {
        line: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// The value list of an `INSERT` line could not be split.
    #[error("malformed value list on line {line}: {source}")]
    MalformedValues {
        line: usize,
        #[source]
        source: ValueListError,
    },

    /// The handler rejected an event.
    #[error(transparent)]
    Handler(E),
}

impl<E> ParseError<E> {
    /// Returns the handler's error if this failure came from the handler.
    pub fn into_handler_error(self) -> Option<E> {
        match self {
            ParseError::Handler(e) => Some(e),
            _ => None,
        }
    }
}
