//! Source location tracking for instructions, arguments and variables
//!
//! Provides position and range types shared by every node of the tree.
//! Positions are zero-based; the character offset counts UTF-16 code units
//! so ranges can be handed to editor clients unchanged.

use serde::Serialize;

/// A position in a Dockerfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    /// 0-based line number
    pub line: u32,
    /// 0-based character offset within the line (UTF-16 code units)
    pub character: u32,
}

impl Position {
    /// Create a position from a line and character offset.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// A span of source text (start to end position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive for text, inclusive for containment)
    pub end: Position,
}

impl Range {
    /// Create a range from start to end positions.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create an empty range at a single position.
    pub fn at(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Whether the position lies inside this range.
    ///
    /// Lines strictly between start and end are fully inside. On the start
    /// line the character must be at or after `start.character`; on the end
    /// line it must be at or before `end.character`.
    pub fn contains(&self, pos: Position) -> bool {
        if pos.line < self.start.line || pos.line > self.end.line {
            return false;
        }
        if pos.line == self.start.line && pos.character < self.start.character {
            return false;
        }
        if pos.line == self.end.line && pos.character > self.end.character {
            return false;
        }
        true
    }

    /// Merge two ranges into one covering both.
    pub fn merge(self, other: Range) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Whether start and end coincide.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the range starts and ends on the same line.
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(feature = "lsp")]
impl From<Position> for lsp_types::Position {
    fn from(pos: Position) -> Self {
        lsp_types::Position::new(pos.line, pos.character)
    }
}

#[cfg(feature = "lsp")]
impl From<lsp_types::Position> for Position {
    fn from(pos: lsp_types::Position) -> Self {
        Position::new(pos.line, pos.character)
    }
}

#[cfg(feature = "lsp")]
impl From<Range> for lsp_types::Range {
    fn from(range: Range) -> Self {
        lsp_types::Range::new(range.start.into(), range.end.into())
    }
}
