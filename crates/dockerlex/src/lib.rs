//! dockerlex - Dockerfile parser for editors and linters
//!
//! Parses Dockerfile text into a syntax model where every node carries its
//! zero-based source range: parser directives, comments, instructions,
//! arguments, flags, JSON exec forms, heredocs, `name=value` declarations,
//! FROM image components and variable references. Parsing never fails;
//! incomplete text produces partial nodes.
//!
//! On top of the syntax tree the [`Dockerfile`] groups instructions into
//! build stages and resolves `$VAR` references against the ARG and ENV
//! declarations visible at each line.
//!
//! # Example
//!
//! ```rust
//! use dockerlex::{Resolution, Template};
//!
//! let dockerfile = dockerlex::parse("FROM alpine AS base\nARG version=1.2\nRUN echo $version\n");
//!
//! let run = dockerfile.runs()[0];
//! assert_eq!(run.expanded_arguments()[1].value(), "1.2");
//! assert_eq!(
//!     dockerfile.resolve_variable("version", 2),
//!     Resolution::DeclaredWithValue("1.2".to_string())
//! );
//! assert_eq!(dockerfile.stages()[0].name(), Some("base"));
//! ```
//!
//! # Logging
//!
//! With the default `logging` feature, parse progress is reported through
//! `tracing`. Document text is never logged unless
//! [`LogConfig::unsafe_log_documents`] is set, and ARG/ENV values with
//! sensitive-looking names are redacted.

mod ast;
pub mod document;
mod error;
mod logging_impl;
pub mod parser;

pub use ast::*;
pub use document::TextDocument;
pub use error::{Error, Result};
pub use logging_impl::{LogConfig, format_document_for_log, sanitize_for_log};
pub use parser::span::{Position, Range};
pub use parser::{Parser, ParserBuilder};

/// Parse `text` with default settings.
pub fn parse(text: impl Into<String>) -> Dockerfile {
    Parser::new().parse(text)
}
