//! Here-document recognition and extraction
//!
//! An operator is an argument of the form `[n]<<[-]NAME` where the name may
//! be quoted. The body is made of the raw physical lines that follow the
//! declaration line, each heredoc ending at the first line equal to its
//! name (after leading tabs are stripped for the `<<-` form).

use std::sync::LazyLock;

use regex::Regex;

use super::lexer::{char_len, continuation_end, line_bounds, skip_filler};
use crate::ast::{Argument, Heredoc};
use crate::document::TextDocument;

static OPERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*(<<-?)([^<]+)$").expect("heredoc pattern compiles"));

/// An operator found in a logical argument value. Spans index into the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Operator {
    pub name: String,
    pub strips_tabs: bool,
    pub op: (usize, usize),
    pub name_span: (usize, usize),
}

/// Recognize a heredoc operator in an argument value.
pub(crate) fn operator(value: &str) -> Option<Operator> {
    let caps = OPERATOR.captures(value)?;
    let op = caps.get(1)?;
    let rest = caps.get(2)?;
    let text = rest.as_str();
    if op.as_str() == "<<" && text.starts_with('-') {
        return None;
    }

    let quoted = text.len() >= 2
        && (text.starts_with('\'') && text.ends_with('\'')
            || text.starts_with('"') && text.ends_with('"'));
    let (name, name_span) = if quoted {
        (
            text[1..text.len() - 1].to_string(),
            (rest.start() + 1, rest.end() - 1),
        )
    } else {
        (
            text.chars().filter(|c| *c != '\'' && *c != '"').collect(),
            (rest.start(), rest.end()),
        )
    };
    if name.is_empty() {
        return None;
    }

    Some(Operator {
        name,
        strips_tabs: op.as_str() == "<<-",
        op: (op.start(), op.end()),
        name_span,
    })
}

/// If `line` terminates a heredoc named `name`, the number of leading bytes
/// stripped before the delimiter.
pub(crate) fn terminator_match(line: &str, name: &str, strips_tabs: bool) -> Option<usize> {
    if strips_tabs {
        let trimmed = line.trim_start_matches('\t');
        (trimmed == name).then(|| line.len() - trimmed.len())
    } else {
        (line == name).then_some(0)
    }
}

/// Offset just past the first line break that is not part of a continuation,
/// i.e. where the heredoc bodies of the instruction start.
pub(crate) fn body_start(text: &str, start: usize, end: usize, escape: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = start;
    while i < end {
        match bytes[i] {
            c if c == escape => match continuation_end(text, i, escape, end) {
                Some(after) => i = skip_filler(text, after, None).min(end),
                None => i += 1 + char_len(text, i + 1),
            },
            b'\n' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Extract the heredocs of an instruction spanning `start..end`.
pub(crate) fn extract(
    doc: &TextDocument,
    escape: u8,
    start: usize,
    end: usize,
    args: &[Argument],
) -> Vec<Heredoc> {
    let text = doc.text();
    let body = body_start(text, start, end, escape);
    let declared_before = body.unwrap_or(end);

    let operators: Vec<(Operator, &Argument)> = args
        .iter()
        .filter(|arg| arg.start() < declared_before)
        .filter_map(|arg| operator(arg.value()).map(|op| (op, arg)))
        .collect();

    let mut heredocs: Vec<Heredoc> = operators
        .iter()
        .map(|(op, arg)| Heredoc {
            name: op.name.clone(),
            strips_tabs: op.strips_tabs,
            operator_range: arg.range_of(doc, op.op.0, op.op.1),
            name_range: arg.range_of(doc, op.name_span.0, op.name_span.1),
            content_range: None,
            delimiter_range: None,
        })
        .collect();

    let Some(body) = body else {
        return heredocs;
    };

    let mut k = 0;
    let mut content_start = body;
    let mut content_end = body;
    let mut pos = body;
    while pos < end && k < heredocs.len() {
        let (line_end, next) = line_bounds(text, pos);
        let line_end = line_end.min(end);
        let heredoc = &mut heredocs[k];
        if let Some(tabs) =
            terminator_match(&text[pos..line_end], &heredoc.name, heredoc.strips_tabs)
        {
            if content_start < pos {
                heredoc.content_range = Some(doc.range(content_start, content_end));
            }
            heredoc.delimiter_range = Some(doc.range(pos + tabs, line_end));
            k += 1;
            content_start = next;
        } else {
            content_end = line_end;
        }
        pos = next;
    }

    if let Some(heredoc) = heredocs.get_mut(k) {
        if content_start < end {
            heredoc.content_range = Some(doc.range(content_start, end));
        }
    }
    heredocs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_forms() {
        let op = operator("<<EOF").unwrap();
        assert_eq!(op.name, "EOF");
        assert!(!op.strips_tabs);
        assert_eq!(op.op, (0, 2));
        assert_eq!(op.name_span, (2, 5));

        let op = operator("<<-'EOT'").unwrap();
        assert_eq!(op.name, "EOT");
        assert!(op.strips_tabs);
        assert_eq!(op.op, (0, 3));
        assert_eq!(op.name_span, (4, 7));

        let op = operator("3<<\"END\"").unwrap();
        assert_eq!(op.name, "END");
        assert_eq!(op.op, (1, 3));
    }

    #[test]
    fn test_not_operators() {
        assert!(operator("<<").is_none());
        assert!(operator("<<-").is_none());
        assert!(operator("<<''").is_none());
        assert!(operator("a<<EOF").is_none());
        assert!(operator("<<<EOF").is_none());
        assert!(operator("echo").is_none());
    }

    #[test]
    fn test_terminator_match() {
        assert_eq!(terminator_match("EOF", "EOF", false), Some(0));
        assert_eq!(terminator_match("\tEOF", "EOF", false), None);
        assert_eq!(terminator_match("\t\tEOF", "EOF", true), Some(2));
        assert_eq!(terminator_match(" EOF", "EOF", true), None);
    }

    #[test]
    fn test_body_start_skips_continuations() {
        let text = "RUN a \\\n b <<EOF\nx\nEOF";
        assert_eq!(body_start(text, 0, text.len(), b'\\'), Some(17));
        assert_eq!(body_start("RUN <<EOF", 0, 9, b'\\'), None);
    }
}
