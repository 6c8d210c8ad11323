//! FROM image reference decomposition
//!
//! `[registry/]name[:tag][@digest]`. Separators inside `${...}` do not count.

/// Byte spans into the image argument's logical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImageParts {
    pub registry: Option<(usize, usize)>,
    pub name: (usize, usize),
    pub tag: Option<(usize, usize)>,
    pub digest: Option<(usize, usize)>,
}

/// Positions of `@`, `/` and `:` outside variable braces.
fn separators(value: &str) -> Vec<(usize, u8)> {
    let bytes = value.as_bytes();
    let mut found = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 1;
            }
            b'}' if depth > 0 => depth -= 1,
            c @ (b'@' | b'/' | b':') if depth == 0 => found.push((i, c)),
            _ => {}
        }
        i += 1;
    }
    found
}

pub(crate) fn split_image(value: &str) -> ImageParts {
    let seps = separators(value);
    let find_last = |sep: u8, from: usize, to: usize| {
        seps.iter()
            .rev()
            .find(|(i, c)| *c == sep && *i >= from && *i < to)
            .map(|(i, _)| *i)
    };

    let at = seps.iter().find(|(_, c)| *c == b'@').map(|(i, _)| *i);
    let digest = at.map(|at| (at + 1, value.len()));
    let rest = at.unwrap_or(value.len());

    let slash = find_last(b'/', 0, rest);
    let colon = find_last(b':', slash.map_or(0, |s| s + 1), rest);
    let tag = colon.map(|colon| (colon + 1, rest));
    let name_end = colon.unwrap_or(rest);

    let first_slash = seps
        .iter()
        .find(|(i, c)| *c == b'/' && *i < name_end)
        .map(|(i, _)| *i);
    let registry = first_slash.filter(|&slash| {
        let component = &value[..slash];
        component.contains(['.', ':']) || component == "localhost"
    });

    ImageParts {
        registry: registry.map(|slash| (0, slash)),
        name: (registry.map_or(0, |slash| slash + 1), name_end),
        tag,
        digest,
    }
}
