use serde::Serialize;

use crate::document::TextDocument;
use crate::parser::span::Range;

/// A `#` comment line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    range: Range,
    content: Option<String>,
    content_range: Option<Range>,
}

impl Comment {
    pub(crate) fn new(doc: &TextDocument, start: usize, end: usize) -> Self {
        let text = doc.slice(start + 1, end);
        let leading = text.len() - text.trim_start().len();
        let trimmed = text.trim();
        let (content, content_range) = if trimmed.is_empty() {
            (None, None)
        } else {
            let from = start + 1 + leading;
            (
                Some(trimmed.to_string()),
                Some(doc.range(from, from + trimmed.len())),
            )
        };
        Self {
            range: doc.range(start, end),
            content,
            content_range,
        }
    }

    /// From the `#` to the end of the line.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Trimmed text after the `#`, if any.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn content_range(&self) -> Option<Range> {
        self.content_range
    }
}
