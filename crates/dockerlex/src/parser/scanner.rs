//! Line scanner
//!
//! Splits the text after the directive block into comments and raw
//! instructions. A single dispatch loop walks an explicit state machine;
//! continuations, the comment lines embedded in them and heredoc bodies are
//! all resolved here so later passes only see instruction boundaries.

use super::heredoc::{operator, terminator_match};
use super::lexer::{char_len, continuation_end, is_blank, line_bounds, skip_filler, tokenize};
use crate::logging_impl::trace_event;

/// Byte spans of one instruction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct RawInstruction {
    /// Name as written, continuations removed
    pub name: String,
    pub name_start: usize,
    pub name_end: usize,
    pub start: usize,
    /// Just past the last non-whitespace byte
    pub end: usize,
}

impl RawInstruction {
    fn new(start: usize) -> Self {
        Self {
            name: String::new(),
            name_start: start,
            name_end: start,
            start,
            end: start,
        }
    }

    fn push_name(&mut self, text: &str, end: usize) {
        self.name.push_str(text);
        self.name_end = end;
        self.end = end;
    }
}

/// Output of the line scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Scan {
    pub instructions: Vec<RawInstruction>,
    /// `(start, end)` of every comment, `#` through the end of its line
    pub comments: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    LineStart,
    Comment,
    Name,
    Arguments,
    Done,
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    escape: u8,
    pos: usize,
    current: RawInstruction,
    scan: Scan,
}

/// Scan `text` from `start` with the given escape byte.
pub(crate) fn scan(text: &str, start: usize, escape: u8) -> Scan {
    let mut scanner = Scanner {
        text,
        bytes: text.as_bytes(),
        escape,
        pos: start,
        current: RawInstruction::default(),
        scan: Scan::default(),
    };
    let mut state = State::LineStart;
    while state != State::Done {
        state = match state {
            State::LineStart => scanner.line_start(),
            State::Comment => scanner.comment(),
            State::Name => scanner.name(),
            State::Arguments => scanner.arguments(),
            State::Done => State::Done,
        };
    }
    scanner.scan
}

impl Scanner<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn finish(&mut self) {
        let instruction = std::mem::take(&mut self.current);
        self.scan.instructions.push(instruction);
    }

    /// Consume a continuation at the current escape byte, if there is one.
    fn continuation(&mut self) -> bool {
        match continuation_end(self.text, self.pos, self.escape, self.text.len()) {
            Some(after) => {
                self.current.end = self.pos + 1;
                self.pos = skip_filler(self.text, after, Some(&mut self.scan.comments));
                true
            }
            None => false,
        }
    }

    fn line_start(&mut self) -> State {
        while !self.at_end() && is_blank(self.bytes[self.pos]) {
            self.pos += 1;
        }
        if self.at_end() {
            State::Done
        } else if self.bytes[self.pos] == b'#' {
            State::Comment
        } else {
            self.current = RawInstruction::new(self.pos);
            State::Name
        }
    }

    fn comment(&mut self) -> State {
        let (end, next) = line_bounds(self.text, self.pos);
        self.scan.comments.push((self.pos, end));
        self.pos = next;
        State::LineStart
    }

    fn name(&mut self) -> State {
        if self.at_end() {
            self.finish();
            return State::Done;
        }
        let c = self.bytes[self.pos];
        if c == self.escape {
            if self.continuation() {
                if self.at_end() || matches!(self.bytes[self.pos], b' ' | b'\t') {
                    return State::Arguments;
                }
                return State::Name;
            }
            let next = self.pos + 1;
            let end = next + char_len(self.text, next);
            self.current.push_name(&self.text[next..end], end);
            self.pos = end;
            return State::Name;
        }
        if is_blank(c) {
            return State::Arguments;
        }
        let end = self.pos + char_len(self.text, self.pos);
        self.current.push_name(&self.text[self.pos..end], end);
        self.pos = end;
        State::Name
    }

    fn arguments(&mut self) -> State {
        if self.at_end() {
            self.finish();
            return State::Done;
        }
        let c = self.bytes[self.pos];
        if c == self.escape {
            if !self.continuation() {
                self.pos += 1 + char_len(self.text, self.pos + 1);
                self.current.end = self.pos;
            }
            return State::Arguments;
        }
        match c {
            b'\n' => {
                self.pos = self.heredoc_bodies(self.pos);
                self.finish();
                State::LineStart
            }
            c if is_blank(c) => {
                self.pos += 1;
                State::Arguments
            }
            _ => {
                self.pos += char_len(self.text, self.pos);
                self.current.end = self.pos;
                State::Arguments
            }
        }
    }

    /// At the logical end of a line, consume the heredoc bodies the line
    /// declares. Returns where scanning resumes.
    fn heredoc_bodies(&mut self, newline: usize) -> usize {
        let resume = newline + 1;
        let keyword = self.current.name.to_ascii_uppercase();
        let pieces = tokenize(self.text, self.current.name_end, newline, self.escape);
        let mut pieces = pieces.iter();
        let accepts_heredocs = |name: &str| {
            matches!(name.to_ascii_uppercase().as_str(), "RUN" | "COPY" | "ADD")
        };
        let eligible = match keyword.as_str() {
            "ONBUILD" => pieces.next().is_some_and(|p| accepts_heredocs(&p.value)),
            other => accepts_heredocs(other),
        };
        if !eligible {
            return resume;
        }

        let operators: Vec<_> = pieces.filter_map(|p| operator(&p.value)).collect();
        if operators.is_empty() {
            return resume;
        }

        let mut pos = resume;
        let mut matched = 0;
        while pos < self.text.len() && matched < operators.len() {
            let (end, next) = line_bounds(self.text, pos);
            let op = &operators[matched];
            if terminator_match(&self.text[pos..end], &op.name, op.strips_tabs).is_some() {
                trace_event!(heredoc = %op.name, line_end = end, "heredoc terminated");
                matched += 1;
            }
            self.current.end = end;
            pos = next;
        }
        trace_event!(
            declared = operators.len(),
            terminated = matched,
            "heredoc bodies consumed"
        );
        pos
    }
}
