//! Error types shared by the reader and writer.

use std::fmt;
use thiserror::Error;

/// 1-based line/column of the next unread character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Position = Position { line: 1, column: 1 };
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// The underlying stream or sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input bytes are not valid in the detected encoding.
    #[error("malformed {encoding} input @{position}")]
    Decode {
        encoding: &'static str,
        position: Position,
    },

    /// Structural violation: tag mismatch, truncation, malformed syntax or a
    /// required node that was not found.
    #[error("{message} pos: {node} @{position}")]
    NotWellFormed {
        message: String,
        position: Position,
        node: String,
    },

    /// The reader already reported a fatal error.
    #[error("reader is unusable after an earlier error")]
    Unusable,
}

impl Error {
    /// Whether this error came from a structural violation in the input.
    pub fn is_well_formedness(&self) -> bool {
        matches!(self, Error::NotWellFormed { .. })
    }

    /// Position attached to the error, if any.
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Decode { position, .. } | Error::NotWellFormed { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
