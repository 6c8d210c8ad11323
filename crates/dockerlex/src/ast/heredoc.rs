use serde::Serialize;

use crate::parser::span::Range;

/// A here-document declared by RUN, COPY or ADD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heredoc {
    pub(crate) name: String,
    pub(crate) strips_tabs: bool,
    pub(crate) operator_range: Range,
    pub(crate) name_range: Range,
    pub(crate) content_range: Option<Range>,
    pub(crate) delimiter_range: Option<Range>,
}

impl Heredoc {
    /// Terminator name with quotes removed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the `<<-` form.
    pub fn strips_tabs(&self) -> bool {
        self.strips_tabs
    }

    /// Range of the `<<` or `<<-` operator.
    pub fn operator_range(&self) -> Range {
        self.operator_range
    }

    pub fn name_range(&self) -> Range {
        self.name_range
    }

    /// Lines between the declaration (or previous terminator) and the
    /// terminator; `None` when there are none.
    pub fn content_range(&self) -> Option<Range> {
        self.content_range
    }

    /// Range of the terminating line, leading tabs excluded.
    pub fn delimiter_range(&self) -> Option<Range> {
        self.delimiter_range
    }

    pub fn is_complete(&self) -> bool {
        self.delimiter_range.is_some()
    }
}
