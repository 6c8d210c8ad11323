//! Exec-form (JSON array) micro-parser
//!
//! Recognizes `[ "a", "b" ]` over raw instruction text. Only `\"` and `\\`
//! are escapes inside strings; an escape followed by a line break is a
//! continuation. Scanning stops at the first unexpected character and keeps
//! what was recognized so far.

use super::lexer::{Piece, char_len, continuation_end, is_blank, skip_filler};
use crate::ast::{Argument, JsonArray};
use crate::document::TextDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    AfterOpen,
    InString,
    AfterString,
    AfterComma,
}

/// Parse a JSON array of strings from `start..end`.
pub(crate) fn parse_json(doc: &TextDocument, escape: u8, start: usize, end: usize) -> JsonArray {
    let text = doc.text();
    let bytes = text.as_bytes();
    let mut array = JsonArray::default();
    let mut state = State::Start;
    let mut string = Piece::new(start);
    let mut i = start;

    while i < end {
        let c = bytes[i];
        if state == State::InString {
            if c == b'\\' && matches!(bytes.get(i + 1), Some(b'"' | b'\\')) && i + 1 < end {
                string.push(&text[i + 1..i + 2], i + 1);
                i += 2;
                continue;
            }
            if c == b'\\' || c == escape {
                if let Some(after) = continuation_end(text, i, c, end) {
                    i = skip_filler(text, after, None).min(end);
                    continue;
                }
            }
            match c {
                b'"' => {
                    string.touch(i + 1);
                    let piece = std::mem::replace(&mut string, Piece::new(i + 1));
                    array.strings.push(Argument::from_piece(doc, piece));
                    state = State::AfterString;
                    i += 1;
                }
                b'\n' => break,
                _ => {
                    let len = char_len(text, i);
                    string.push(&text[i..i + len], i);
                    i += len;
                }
            }
            continue;
        }

        if c == escape {
            match continuation_end(text, i, escape, end) {
                Some(after) => {
                    i = skip_filler(text, after, None).min(end);
                    continue;
                }
                None => break,
            }
        }
        if is_blank(c) {
            i += 1;
            continue;
        }

        state = match (state, c) {
            (State::Start, b'[') => {
                array.open = Some(doc.range(i, i + 1));
                State::AfterOpen
            }
            (State::AfterOpen | State::AfterComma, b'"') => {
                string = Piece::new(i);
                State::InString
            }
            (State::AfterOpen | State::AfterString, b']') => {
                array.close = Some(doc.range(i, i + 1));
                array.clean_tail = text[i + 1..end].trim().is_empty();
                break;
            }
            (State::AfterString, b',') => State::AfterComma,
            _ => break,
        };
        i += 1;
    }
    array
}
