//! Text buffer with offset/position conversion
//!
//! The parser works on byte offsets; every node reports editor positions.
//! `TextDocument` converts between the two and hands out substrings.

use crate::parser::span::{Position, Range};

/// An immutable Dockerfile buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    text: String,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl TextDocument {
    /// Create a document over the given text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { text, line_starts }
    }

    /// The full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines; a trailing newline opens one more (empty) line.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Convert a byte offset into a position. Offsets past the end clamp to
    /// the end of the document.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let character = self.text[start..offset].encode_utf16().count();
        Position::new(line as u32, character as u32)
    }

    /// Convert a position into a byte offset. Positions past the end of a
    /// line clamp to the line end; lines past the end clamp to the document end.
    pub fn offset_at(&self, pos: Position) -> usize {
        let Some(&start) = self.line_starts.get(pos.line as usize) else {
            return self.text.len();
        };
        let mut units = 0u32;
        for (i, ch) in self.text[start..].char_indices() {
            if ch == '\n' || units >= pos.character {
                return start + i;
            }
            units += ch.len_utf16() as u32;
        }
        self.text.len()
    }

    /// Range covering the byte span `start..end`.
    pub fn range(&self, start: usize, end: usize) -> Range {
        Range::new(self.position_at(start), self.position_at(end))
    }

    /// Substring for the byte span `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.text.len());
        let start = start.min(end);
        &self.text[start..end]
    }

    /// Text covered by a range.
    pub fn text_in(&self, range: Range) -> &str {
        self.slice(self.offset_at(range.start), self.offset_at(range.end))
    }

    /// Text of a line without its line break (and without a trailing `\r`).
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let start = *self.line_starts.get(line as usize)?;
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let text = &self.text[start..end];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }
}
