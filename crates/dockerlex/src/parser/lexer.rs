//! Argument tokenizers
//!
//! Splits instruction text into logical arguments while tracking, for every
//! byte of a logical value, the document offset it was read from. Escaped
//! line breaks are elided and the blank or comment lines that follow them
//! are skipped, the way the Docker builder joins physical lines.

/// A logical token assembled from one or more physical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Piece {
    /// Logical value (escapes and quotes resolved)
    pub value: String,
    /// Document offset of each byte of `value`
    pub offsets: Vec<usize>,
    /// Offset of the first source byte
    pub start: usize,
    /// Offset just past the last source byte
    pub end: usize,
    /// Position of the unquoted `=` as (index into `value`, document offset)
    pub split: Option<(usize, usize)>,
}

impl Piece {
    pub(crate) fn new(start: usize) -> Self {
        Self {
            value: String::new(),
            offsets: Vec::new(),
            start,
            end: start,
            split: None,
        }
    }

    /// Append source text that was read at `offset`.
    pub(crate) fn push(&mut self, text: &str, offset: usize) {
        self.value.push_str(text);
        self.offsets.extend(offset..offset + text.len());
        self.end = offset + text.len();
    }

    /// Mark the end of the source region without adding logical text
    /// (closing quotes).
    pub(crate) fn touch(&mut self, end: usize) {
        self.end = end;
    }
}

/// Whitespace separating tokens.
pub(crate) fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Length in bytes of the character starting at `pos`.
pub(crate) fn char_len(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(1, char::len_utf8)
}

/// End of the line starting at or containing `pos` (excluding `\r\n`) and the
/// start of the next line.
pub(crate) fn line_bounds(text: &str, pos: usize) -> (usize, usize) {
    let bytes = text.as_bytes();
    match bytes[pos..].iter().position(|&b| b == b'\n') {
        Some(rel) => {
            let newline = pos + rel;
            let end = if newline > pos && bytes[newline - 1] == b'\r' {
                newline - 1
            } else {
                newline
            };
            (end, newline + 1)
        }
        None => (text.len(), text.len()),
    }
}

/// If the escape character at `pos` starts a line continuation (escape,
/// optional whitespace, then a line break or `limit`), return the offset
/// just past the line break.
pub(crate) fn continuation_end(text: &str, pos: usize, escape: u8, limit: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if pos >= limit || bytes[pos] != escape {
        return None;
    }
    let mut j = pos + 1;
    while j < limit && matches!(bytes[j], b' ' | b'\t' | b'\r') {
        j += 1;
    }
    if j >= limit {
        Some(limit)
    } else if bytes[j] == b'\n' {
        Some(j + 1)
    } else {
        None
    }
}

/// Skip the empty lines and comment lines that may follow a continuation.
/// Returns the offset where the next content line starts. Skipped comments
/// are recorded as `(start, end)` spans when `comments` is given.
pub(crate) fn skip_filler(
    text: &str,
    mut pos: usize,
    mut comments: Option<&mut Vec<(usize, usize)>>,
) -> usize {
    let bytes = text.as_bytes();
    while pos < text.len() {
        let (end, next) = line_bounds(text, pos);
        let mut first = pos;
        while first < end && matches!(bytes[first], b' ' | b'\t' | b'\r') {
            first += 1;
        }
        if first == end {
            if next >= text.len() && end == text.len() {
                return text.len();
            }
        } else if bytes[first] == b'#' {
            if let Some(comments) = comments.as_deref_mut() {
                comments.push((first, end));
            }
        } else {
            return pos;
        }
        pos = next;
    }
    pos
}

/// Split `start..end` into whitespace-separated logical tokens.
pub(crate) fn tokenize(text: &str, start: usize, end: usize, escape: u8) -> Vec<Piece> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut current: Option<Piece> = None;
    let mut i = start;

    while i < end {
        let c = bytes[i];
        if c == escape {
            if let Some(after) = continuation_end(text, i, escape, end) {
                i = skip_filler(text, after, None).min(end);
                continue;
            }
            let next = i + 1;
            let len = char_len(text, next);
            current
                .get_or_insert_with(|| Piece::new(i))
                .push(&text[next..next + len], next);
            i = next + len;
            continue;
        }
        if is_blank(c) {
            if let Some(piece) = current.take() {
                pieces.push(piece);
            }
            i += 1;
            continue;
        }
        let len = char_len(text, i);
        current
            .get_or_insert_with(|| Piece::new(i))
            .push(&text[i..i + len], i);
        i += len;
    }
    if let Some(piece) = current.take() {
        pieces.push(piece);
    }
    pieces
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Plain,
    Single,
    Double,
    Brace(usize),
}

/// Tokenize a property list (ARG, ENV, LABEL).
///
/// Quoted strings and `${...}` expansions are atomic, quotes are removed from
/// the logical value, and the first unquoted `=` of each token is recorded in
/// [`Piece::split`]. With `split_words` off the whole region becomes a single
/// token and `=` is not special.
pub(crate) fn tokenize_properties(
    text: &str,
    start: usize,
    end: usize,
    escape: u8,
    split_words: bool,
) -> Vec<Piece> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut current: Option<Piece> = None;
    let mut mode = Quote::Plain;
    let mut i = start;

    while i < end {
        let c = bytes[i];
        if c == escape {
            if let Some(after) = continuation_end(text, i, escape, end) {
                i = skip_filler(text, after, None).min(end);
                continue;
            }
            if mode != Quote::Single {
                let next = i + 1;
                let len = char_len(text, next);
                current
                    .get_or_insert_with(|| Piece::new(i))
                    .push(&text[next..next + len], next);
                i = next + len;
                continue;
            }
        }

        match mode {
            Quote::Plain if split_words && is_blank(c) => {
                if let Some(piece) = current.take() {
                    pieces.push(piece);
                }
                i += 1;
                continue;
            }
            Quote::Plain => {
                let piece = current.get_or_insert_with(|| Piece::new(i));
                match c {
                    b'\'' => {
                        mode = Quote::Single;
                        piece.touch(i + 1);
                        i += 1;
                        continue;
                    }
                    b'"' => {
                        mode = Quote::Double;
                        piece.touch(i + 1);
                        i += 1;
                        continue;
                    }
                    b'$' if bytes.get(i + 1) == Some(&b'{') && i + 1 < end => {
                        piece.push("${", i);
                        mode = Quote::Brace(1);
                        i += 2;
                        continue;
                    }
                    b'=' if split_words && piece.split.is_none() => {
                        piece.split = Some((piece.value.len(), i));
                    }
                    _ => {}
                }
            }
            Quote::Single if c == b'\'' => {
                mode = Quote::Plain;
                if let Some(piece) = current.as_mut() {
                    piece.touch(i + 1);
                }
                i += 1;
                continue;
            }
            Quote::Double if c == b'"' => {
                mode = Quote::Plain;
                if let Some(piece) = current.as_mut() {
                    piece.touch(i + 1);
                }
                i += 1;
                continue;
            }
            Quote::Brace(depth) => {
                if c == b'$' && bytes.get(i + 1) == Some(&b'{') && i + 1 < end {
                    if let Some(piece) = current.as_mut() {
                        piece.push("${", i);
                    }
                    mode = Quote::Brace(depth + 1);
                    i += 2;
                    continue;
                }
                if c == b'}' {
                    mode = if depth == 1 {
                        Quote::Plain
                    } else {
                        Quote::Brace(depth - 1)
                    };
                }
            }
            Quote::Single | Quote::Double => {}
        }

        let len = char_len(text, i);
        current
            .get_or_insert_with(|| Piece::new(i))
            .push(&text[i..i + len], i);
        i += len;
    }
    if let Some(piece) = current.take() {
        pieces.push(piece);
    }
    pieces
}
