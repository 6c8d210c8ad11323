use serde::Serialize;

use crate::document::TextDocument;
use crate::parser::lexer::{Piece, line_bounds};
use crate::parser::span::{Position, Range};

/// One logical argument of an instruction.
///
/// `value` has escapes (and, for property lists, quotes) resolved while
/// `raw` is the exact source text covered by `range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    value: String,
    raw: String,
    range: Range,
    /// Physical-line pieces the value was read from
    segments: Vec<Range>,
    #[serde(skip)]
    offsets: Vec<usize>,
    #[serde(skip)]
    start: usize,
    #[serde(skip)]
    end: usize,
}

impl Argument {
    pub(crate) fn from_piece(doc: &TextDocument, piece: Piece) -> Self {
        let segments = segments(doc, &piece.offsets);
        Self {
            raw: doc.slice(piece.start, piece.end).to_string(),
            range: doc.range(piece.start, piece.end),
            value: piece.value,
            segments,
            offsets: piece.offsets,
            start: piece.start,
            end: piece.end,
        }
    }

    /// The same argument carrying a different logical value.
    pub(crate) fn with_value(&self, value: String, offsets: Vec<usize>) -> Self {
        Self {
            value,
            offsets,
            ..self.clone()
        }
    }

    /// Logical value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Source text of the argument, escapes and line breaks included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Ranges of the physical-line pieces the argument spans.
    pub fn segments(&self) -> &[Range] {
        &self.segments
    }

    /// Whether `pos` falls inside the argument.
    pub fn contains(&self, pos: Position) -> bool {
        self.range.contains(pos)
    }

    pub(crate) fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub(crate) fn start(&self) -> usize {
        self.start
    }

    pub(crate) fn end(&self) -> usize {
        self.end
    }

    /// Document byte span of `value[from..to]`.
    pub(crate) fn span_of(&self, from: usize, to: usize) -> (usize, usize) {
        if from >= to {
            let at = self.offsets.get(from).copied().unwrap_or(self.end);
            return (at, at);
        }
        let start = self.offsets.get(from).copied().unwrap_or(self.end);
        let end = self
            .offsets
            .get(to - 1)
            .map(|last| last + 1)
            .unwrap_or(self.end);
        (start, end)
    }

    /// Document range of `value[from..to]`.
    pub(crate) fn range_of(&self, doc: &TextDocument, from: usize, to: usize) -> Range {
        let (start, end) = self.span_of(from, to);
        doc.range(start, end)
    }
}

/// Split a value's source offsets into runs that stay on one line. A run
/// that was joined to the next by a continuation ends at its line break, so
/// the escape and any trailing blanks belong to it.
fn segments(doc: &TextDocument, offsets: &[usize]) -> Vec<Range> {
    let text = doc.text();
    let mut segments = Vec::new();
    let Some(&first) = offsets.first() else {
        return segments;
    };
    let mut seg_start = first;
    let mut prev = first;
    for &offset in &offsets[1..] {
        if offset > prev + 1 && text[prev + 1..offset].contains('\n') {
            let (line_end, _) = line_bounds(text, prev);
            segments.push(doc.range(seg_start, line_end));
            seg_start = offset;
        }
        prev = offset;
    }
    segments.push(doc.range(seg_start, prev + 1));
    segments
}
