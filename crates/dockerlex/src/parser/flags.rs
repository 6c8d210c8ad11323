//! Flag and option decomposition
//!
//! Flags are the leading `--name[=value]` arguments of RUN, COPY, ADD, FROM
//! and HEALTHCHECK. A value containing `,` or `=` is further split into
//! `key[=value]` options (`--mount=type=cache,target=/root/.cache`). An
//! escaped `,` stays inside its option.

use crate::ast::{Argument, Flag, FlagOption};
use crate::document::TextDocument;

/// Parse the leading flags of `args`. Returns the flags and how many
/// arguments they consumed.
pub(crate) fn parse_flags(
    doc: &TextDocument,
    args: &[Argument],
    escape: u8,
) -> (Vec<Flag>, usize) {
    let flags: Vec<Flag> = args
        .iter()
        .take_while(|arg| arg.value().starts_with("--"))
        .map(|arg| parse_flag(doc, arg, escape))
        .collect();
    let consumed = flags.len();
    (flags, consumed)
}

fn parse_flag(doc: &TextDocument, arg: &Argument, escape: u8) -> Flag {
    let value = arg.value();
    let body = &value[2..];
    let (name_end, flag_value) = match body.find('=') {
        Some(eq) => (2 + eq, Some(2 + eq + 1)),
        None => (value.len(), None),
    };

    let options = match flag_value {
        Some(from) if value[from..].contains([',', '=']) => {
            parse_options(doc, arg, from, escape)
        }
        _ => Vec::new(),
    };

    Flag {
        name: value[2..name_end].to_string(),
        name_range: arg.range_of(doc, 2, name_end),
        value: flag_value.map(|from| value[from..].to_string()),
        value_range: flag_value.map(|from| arg.range_of(doc, from, value.len())),
        range: arg.range(),
        options,
    }
}

fn parse_options(doc: &TextDocument, arg: &Argument, from: usize, escape: u8) -> Vec<FlagOption> {
    let value = arg.value();
    let mut bounds: Vec<usize> = (from..value.len())
        .filter(|&at| value.as_bytes()[at] == b',' && !is_escaped(doc, arg, at, escape))
        .collect();
    bounds.push(value.len());

    let mut options = Vec::new();
    let mut start = from;
    for end in bounds {
        let segment = &value[start..end];
        let (name_end, option_value) = match segment.find('=') {
            Some(eq) => (start + eq, Some(start + eq + 1)),
            None => (end, None),
        };
        options.push(FlagOption {
            name: value[start..name_end].to_string(),
            name_range: arg.range_of(doc, start, name_end),
            value: option_value.map(|v| value[v..end].to_string()),
            value_range: option_value.map(|v| arg.range_of(doc, v, end)),
            range: arg.range_of(doc, start, end),
        });
        start = end + 1;
    }
    options
}

/// Whether the logical byte at `at` came from an escape sequence in the
/// source, i.e. the source byte before it is an escape that was elided.
fn is_escaped(doc: &TextDocument, arg: &Argument, at: usize, escape: u8) -> bool {
    let offsets = arg.offsets();
    let Some(&source) = offsets.get(at) else {
        return false;
    };
    let elided = at == 0 || offsets[at - 1] + 1 != source;
    elided && source > 0 && doc.text().as_bytes()[source - 1] == escape
}
