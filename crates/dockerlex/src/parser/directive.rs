//! Parser directive pass
//!
//! Directives (`# escape=`, `# syntax=`) may only appear in the leading
//! block of a Dockerfile. The block ends at the first line that is not a
//! directive, including blank lines and plain comments. A `# name=value`
//! line with an unknown name is a plain comment and ends the block too.

use std::sync::LazyLock;

use regex::Regex;

use super::lexer::line_bounds;
use crate::ast::Directive;

static DIRECTIVE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*#[ \t]*([A-Za-z][A-Za-z0-9]*)[ \t]*=[ \t]*(.*?)[ \t]*$")
        .expect("directive pattern compiles")
});

/// Byte spans of one directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawDirective {
    pub name: (usize, usize),
    pub value: (usize, usize),
    /// From `#` to the end of the value
    pub span: (usize, usize),
}

/// Result of the directive pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectiveBlock {
    pub directives: Vec<RawDirective>,
    /// Escape byte chosen by the first `escape` directive, if valid
    pub escape: u8,
    /// Where instruction scanning starts
    pub body_start: usize,
}

/// Read the leading directive block of `text`.
pub(crate) fn scan_directives(text: &str) -> DirectiveBlock {
    let mut directives = Vec::new();
    let mut escape = None;
    let mut pos = 0;

    while pos < text.len() {
        let (end, next) = line_bounds(text, pos);
        let Some(caps) = DIRECTIVE_LINE.captures(&text[pos..end]) else {
            break;
        };
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            break;
        };
        if name.as_str().parse::<Directive>().is_err() {
            break;
        }
        let hash = pos + text[pos..end].find('#').unwrap_or(0);
        let directive = RawDirective {
            name: (pos + name.start(), pos + name.end()),
            value: (pos + value.start(), pos + value.end()),
            span: (hash, pos + value.end()),
        };

        if escape.is_none() && name.as_str().eq_ignore_ascii_case("escape") {
            escape = Some(match value.as_str() {
                "`" => b'`',
                _ => b'\\',
            });
        }

        directives.push(directive);
        pos = next;
    }

    DirectiveBlock {
        directives,
        escape: escape.unwrap_or(b'\\'),
        body_start: pos.min(text.len()),
    }
}
