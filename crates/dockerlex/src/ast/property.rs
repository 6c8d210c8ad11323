use serde::Serialize;

use crate::document::TextDocument;
use crate::parser::lexer::Piece;
use crate::parser::span::Range;

/// A `name[=value]` declaration of ARG, ENV or LABEL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    name: String,
    name_range: Range,
    value: Option<String>,
    raw_value: Option<String>,
    value_range: Option<Range>,
    range: Range,
}

impl Property {
    /// Build from a property token split at its first unquoted `=`.
    pub(crate) fn from_piece(doc: &TextDocument, piece: &Piece) -> Self {
        let (name, name_end, value) = match piece.split {
            Some((index, eq)) => (
                piece.value[..index].to_string(),
                eq,
                Some((piece.value[index + 1..].to_string(), eq + 1)),
            ),
            None => (piece.value.clone(), piece.end, None),
        };
        let (value, raw_value, value_range) = match value {
            Some((value, from)) => (
                Some(value),
                Some(doc.slice(from, piece.end).to_string()),
                Some(doc.range(from, piece.end)),
            ),
            None => (None, None, None),
        };
        Self {
            name,
            name_range: doc.range(piece.start, name_end),
            value,
            raw_value,
            value_range,
            range: doc.range(piece.start, piece.end),
        }
    }

    /// Legacy `KEY value words...` form: `value` covers everything after the name.
    pub(crate) fn legacy(doc: &TextDocument, name: &Piece, value: Option<&Piece>) -> Self {
        let mut property = Self::from_piece(doc, &Piece { split: None, ..name.clone() });
        if let Some(value) = value {
            property.value = Some(value.value.clone());
            property.raw_value = Some(doc.slice(value.start, value.end).to_string());
            property.value_range = Some(doc.range(value.start, value.end));
            property.range = doc.range(name.start, value.end);
        }
        property
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_range(&self) -> Range {
        self.name_range
    }

    /// Logical value; `None` for a bare `name`, `Some("")` for `name=`.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Source text of the value, quotes and escapes included.
    pub fn raw_value(&self) -> Option<&str> {
        self.raw_value.as_deref()
    }

    pub fn value_range(&self) -> Option<Range> {
        self.value_range
    }

    pub fn range(&self) -> Range {
        self.range
    }
}
