//! Variable references
//!
//! Finds `$name` and `${name[:op word]}` references in the raw text of an
//! argument and expands resolved references into a new logical value.

use super::lexer::{char_len, continuation_end, skip_filler};
use crate::ast::{Argument, Resolution, Variable};
use crate::document::TextDocument;

/// Skip a continuation starting at `pos`, if there is one.
fn skip_continuation(text: &str, pos: usize, escape: u8, end: usize) -> Option<usize> {
    continuation_end(text, pos, escape, end).map(|after| skip_filler(text, after, None).min(end))
}

/// Find variable references in `start..end`. Resolution is filled in later.
pub(crate) fn scan_variables(
    doc: &TextDocument,
    escape: u8,
    start: usize,
    end: usize,
) -> Vec<Variable> {
    let text = doc.text();
    let bytes = text.as_bytes();
    let mut variables = Vec::new();
    let mut i = start;

    while i < end {
        let c = bytes[i];
        if c == escape {
            i = skip_continuation(text, i, escape, end)
                .unwrap_or_else(|| i + 1 + char_len(text, i + 1));
            continue;
        }
        if c != b'$' {
            i += char_len(text, i);
            continue;
        }
        if i + 1 < end && bytes[i + 1] == b'{' {
            match braced(doc, escape, i, end) {
                Braced::Variable(variable, next) => {
                    variables.push(*variable);
                    i = next;
                }
                Braced::Empty(next) => i = next,
                Braced::Unbalanced => break,
            }
        } else {
            match bare(doc, escape, i, end) {
                Some((variable, next)) => {
                    variables.push(variable);
                    i = next;
                }
                None => i += 1,
            }
        }
    }
    variables
}

fn unresolved(
    doc: &TextDocument,
    name: String,
    name_span: (usize, usize),
    span: (usize, usize),
) -> Variable {
    Variable {
        name,
        name_range: doc.range(name_span.0, name_span.1),
        range: doc.range(span.0, span.1),
        modifier: None,
        modifier_range: None,
        substitution: None,
        substitution_range: None,
        resolution: Resolution::Undeclared,
        source: None,
        span,
    }
}

/// `$name`, ending at `$`, a quote, whitespace or the end of the argument.
fn bare(doc: &TextDocument, escape: u8, dollar: usize, end: usize) -> Option<(Variable, usize)> {
    let text = doc.text();
    let bytes = text.as_bytes();
    let mut name = String::new();
    let mut name_start = None;
    let mut name_end = dollar + 1;
    let mut j = dollar + 1;

    while j < end {
        let c = bytes[j];
        if c == escape {
            match skip_continuation(text, j, escape, end) {
                Some(next) => {
                    j = next;
                    continue;
                }
                None => break,
            }
        }
        if matches!(c, b'$' | b'\'' | b'"' | b' ' | b'\t' | b'\r' | b'\n') {
            break;
        }
        let len = char_len(text, j);
        name.push_str(&text[j..j + len]);
        name_start.get_or_insert(j);
        j += len;
        name_end = j;
    }

    let name_start = name_start?;
    let variable = unresolved(doc, name, (name_start, name_end), (dollar, name_end));
    Some((variable, j))
}

enum Braced {
    Variable(Box<Variable>, usize),
    /// `${}` or a reference without a name; scanning resumes after it
    Empty(usize),
    /// No balancing `}`; nothing after it is a reference
    Unbalanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Name,
    Modifier,
    Substitution,
}

/// `${...}` starting at `dollar`.
fn braced(doc: &TextDocument, escape: u8, dollar: usize, end: usize) -> Braced {
    let text = doc.text();
    let bytes = text.as_bytes();

    let mut depth = 1;
    let mut close = None;
    let mut j = dollar + 2;
    while j < end {
        let c = bytes[j];
        if c == escape {
            j = skip_continuation(text, j, escape, end)
                .unwrap_or_else(|| j + 1 + char_len(text, j + 1));
            continue;
        }
        if c == b'$' && j + 1 < end && bytes[j + 1] == b'{' {
            depth += 1;
            j += 2;
            continue;
        }
        if c == b'}' {
            depth -= 1;
            if depth == 0 {
                close = Some(j);
                break;
            }
        }
        j += char_len(text, j);
    }
    let Some(close) = close else {
        return Braced::Unbalanced;
    };

    let mut part = Part::Name;
    let mut name = String::new();
    let mut name_span: Option<(usize, usize)> = None;
    let mut modifier: Option<(String, usize, usize)> = None;
    let mut substitution = String::new();
    let mut substitution_span: Option<(usize, usize)> = None;

    let mut k = dollar + 2;
    while k < close {
        if bytes[k] == escape {
            if let Some(next) = skip_continuation(text, k, escape, close) {
                k = next;
                continue;
            }
        }
        let len = char_len(text, k);
        let ch = &text[k..k + len];
        match part {
            Part::Name if ch == ":" => part = Part::Modifier,
            Part::Name => {
                name.push_str(ch);
                let from = name_span.map_or(k, |(s, _)| s);
                name_span = Some((from, k + len));
            }
            Part::Modifier => {
                modifier = Some((ch.to_string(), k, k + len));
                part = Part::Substitution;
            }
            Part::Substitution => {
                substitution.push_str(ch);
                let from = substitution_span.map_or(k, |(s, _)| s);
                substitution_span = Some((from, k + len));
            }
        }
        k += len;
    }

    let Some(name_span) = name_span else {
        return Braced::Empty(close + 1);
    };
    let mut variable = unresolved(doc, name, name_span, (dollar, close + 1));
    match part {
        Part::Name => {}
        Part::Modifier => {
            variable.modifier = Some(String::new());
            variable.modifier_range = Some(doc.range(close, close));
        }
        Part::Substitution => {
            if let Some((op, from, to)) = modifier {
                variable.modifier = Some(op);
                variable.modifier_range = Some(doc.range(from, to));
            }
            let (from, to) = substitution_span.unwrap_or((close, close));
            variable.substitution = Some(substitution);
            variable.substitution_range = Some(doc.range(from, to));
        }
    }
    Braced::Variable(Box::new(variable), close + 1)
}

/// Replace resolved references in an argument's logical value.
///
/// Substituted text maps to the offset of the reference's `$`.
pub(crate) fn expand(arg: &Argument, variables: &[Variable]) -> Argument {
    let source = arg.value();
    let offsets = arg.offsets();
    let mut value = String::with_capacity(source.len());
    let mut mapped = Vec::with_capacity(offsets.len());
    let mut last_replaced = None;
    let mut idx = 0;

    while idx < source.len() {
        let len = char_len(source, idx);
        let offset = offsets.get(idx).copied().unwrap_or(arg.end());
        let hit = variables
            .iter()
            .position(|v| v.span.0 <= offset && offset < v.span.1);

        match hit {
            Some(index) if last_replaced == Some(index) => {}
            Some(index) => match variables[index].expansion() {
                Some(text) => {
                    mapped.extend(std::iter::repeat_n(variables[index].span.0, text.len()));
                    value.push_str(&text);
                    last_replaced = Some(index);
                }
                None => {
                    value.push_str(&source[idx..idx + len]);
                    mapped.extend_from_slice(&offsets[idx..(idx + len).min(offsets.len())]);
                }
            },
            None => {
                value.push_str(&source[idx..idx + len]);
                mapped.extend_from_slice(&offsets[idx..(idx + len).min(offsets.len())]);
            }
        }
        idx += len;
    }
    arg.with_value(value, mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::span::{Position, Range};

    fn scan(text: &str) -> Vec<Variable> {
        let doc = TextDocument::new(text);
        scan_variables(&doc, b'\\', 0, text.len())
    }

    fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
        Range::new(Position::new(sl, sc), Position::new(el, ec))
    }

    #[test]
    fn test_bare_reference() {
        let vars = scan("echo $var done");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name(), "var");
        assert_eq!(vars[0].name_range(), range(0, 6, 0, 9));
        assert_eq!(vars[0].range(), range(0, 5, 0, 9));
        assert_eq!(vars[0].modifier(), None);
    }

    #[test]
    fn test_bare_stops_at_dollar_and_quote() {
        let vars = scan("$a$b\"$c\"");
        let names: Vec<_> = vars.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_escaped_dollar_is_not_a_variable() {
        assert!(scan("\\$var").is_empty());
        assert!(scan("$ x").is_empty());
    }

    #[test]
    fn test_braced_with_modifier() {
        let vars = scan("${name:-default}");
        let var = &vars[0];
        assert_eq!(var.name(), "name");
        assert_eq!(var.name_range(), range(0, 2, 0, 6));
        assert_eq!(var.modifier(), Some("-"));
        assert_eq!(var.modifier_range(), Some(range(0, 7, 0, 8)));
        assert_eq!(var.substitution(), Some("default"));
        assert_eq!(var.substitution_range(), Some(range(0, 8, 0, 15)));
        assert_eq!(var.range(), range(0, 0, 0, 16));
    }

    #[test]
    fn test_empty_modifier_and_substitution() {
        let vars = scan("${a:} ${b:+}");
        assert_eq!(vars[0].modifier(), Some(""));
        assert_eq!(vars[0].modifier_range(), Some(Range::at(Position::new(0, 4))));
        assert_eq!(vars[0].substitution(), None);
        assert_eq!(vars[1].modifier(), Some("+"));
        assert_eq!(vars[1].substitution(), Some(""));
        assert_eq!(vars[1].substitution_range(), Some(Range::at(Position::new(0, 11))));
    }

    #[test]
    fn test_nested_braces() {
        let vars = scan("${a:-${b}}x");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].substitution(), Some("${b}"));
        assert_eq!(vars[0].range(), range(0, 0, 0, 10));
    }

    #[test]
    fn test_unbalanced_stops_scanning() {
        assert!(scan("${a $b").is_empty());
        assert_eq!(scan("$x ${a").len(), 1);
    }

    #[test]
    fn test_reference_across_continuation() {
        let vars = scan("${na\\\nme}");
        assert_eq!(vars[0].name(), "name");
        assert_eq!(vars[0].name_range(), range(0, 2, 1, 2));
        assert_eq!(vars[0].range(), range(0, 0, 1, 3));
    }
}
