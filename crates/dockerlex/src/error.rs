//! Error types for dockerlex
//!
//! Parsing itself never fails: incomplete or invalid Dockerfile text yields
//! partial nodes. These errors cover the typed conversions around the tree
//! (keywords, directives, escape characters).

use thiserror::Error;

/// Result type alias using dockerlex's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// dockerlex error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The text is not a known Dockerfile instruction keyword.
    #[error("unknown instruction keyword: {0}")]
    UnknownKeyword(String),

    /// The text is not a recognized parser directive name.
    #[error("unknown parser directive: {0}")]
    UnknownDirective(String),

    /// The character cannot be used as an escape character.
    #[error("invalid escape character: {0:?} (expected '\\' or '`')")]
    InvalidEscape(char),
}
