//! Here-documents on RUN, COPY, ADD and ONBUILD triggers

use dockerlex::{Heredoc, Keyword, Position, Range, Template, parse};
use pretty_assertions::assert_eq;

fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
    Range::new(Position::new(sl, sc), Position::new(el, ec))
}

fn heredocs(text: &str) -> Vec<Heredoc> {
    parse(text).instructions()[0].heredocs().to_vec()
}

#[test]
fn operator_and_name_ranges() {
    let docs = heredocs("RUN <<EOF\necho hi\nEOF\n");
    assert_eq!(docs[0].operator_range(), range(0, 4, 0, 6));
    assert_eq!(docs[0].name_range(), range(0, 6, 0, 9));
    assert!(docs[0].is_complete());
    assert!(!docs[0].strips_tabs());
}

#[test]
fn tab_stripping_form() {
    let docs = heredocs("RUN <<-EOF\n\techo hi\n\tEOF\n");
    assert!(docs[0].strips_tabs());
    assert_eq!(docs[0].content_range(), Some(range(1, 0, 1, 8)));
    assert_eq!(docs[0].delimiter_range(), Some(range(2, 1, 2, 4)));
}

#[test]
fn indented_terminator_needs_tab_stripping() {
    let dockerfile = parse("RUN <<EOF\n\tEOF\nEOF\nUSER me\n");
    let docs = dockerfile.instructions()[0].heredocs();
    assert_eq!(docs[0].content_range(), Some(range(1, 0, 1, 4)));
    assert_eq!(docs[0].delimiter_range(), Some(range(2, 0, 2, 3)));
    assert_eq!(dockerfile.instructions().len(), 2);
}

#[test]
fn quoted_names() {
    let docs = heredocs("COPY <<'EOT' /etc/motd\nwelcome\nEOT\n");
    assert_eq!(docs[0].name(), "EOT");
    assert_eq!(docs[0].name_range(), range(0, 8, 0, 11));

    let docs = heredocs("ADD <<\"EOT\" /etc/motd\nwelcome\nEOT\n");
    assert_eq!(docs[0].name(), "EOT");
}

#[test]
fn multiple_heredocs_in_order() {
    let docs = heredocs("RUN <<A cat - <<B\na\nA\nb\nB\n");
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].name(), "A");
    assert_eq!(docs[0].content_range(), Some(range(1, 0, 1, 1)));
    assert_eq!(docs[0].delimiter_range(), Some(range(2, 0, 2, 1)));
    assert_eq!(docs[1].name(), "B");
    assert_eq!(docs[1].content_range(), Some(range(3, 0, 3, 1)));
    assert_eq!(docs[1].delimiter_range(), Some(range(4, 0, 4, 1)));
}

#[test]
fn empty_body_has_no_content() {
    let docs = heredocs("RUN <<EOF\nEOF\n");
    assert_eq!(docs[0].content_range(), None);
    assert_eq!(docs[0].delimiter_range(), Some(range(1, 0, 1, 3)));
}

#[test]
fn single_line_declaration_is_incomplete() {
    let docs = heredocs("RUN <<EOF");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content_range(), None);
    assert_eq!(docs[0].delimiter_range(), None);
    assert!(!docs[0].is_complete());
}

#[test]
fn unterminated_body_runs_to_end() {
    let dockerfile = parse("RUN <<EOF\nline one\nFROM alpine\n");
    assert_eq!(dockerfile.instructions().len(), 1);
    let docs = dockerfile.instructions()[0].heredocs();
    assert_eq!(docs[0].content_range(), Some(range(1, 0, 2, 11)));
    assert_eq!(docs[0].delimiter_range(), None);
}

#[test]
fn second_heredoc_never_reached() {
    let docs = heredocs("RUN <<A <<B\nx\nA\n");
    assert_eq!(docs[0].delimiter_range(), Some(range(2, 0, 2, 1)));
    assert_eq!(docs[1].content_range(), None);
    assert_eq!(docs[1].delimiter_range(), None);
}

#[test]
fn body_lines_are_not_instructions_or_comments() {
    let dockerfile = parse("FROM alpine\nRUN <<EOF\n# not a comment\nUSER root\nEOF\nUSER app\n");
    assert!(dockerfile.comments().is_empty());
    let keywords: Vec<&str> = dockerfile.instructions().iter().map(|i| i.keyword()).collect();
    assert_eq!(keywords, ["FROM", "RUN", "USER"]);
    assert_eq!(dockerfile.runs()[0].range(), range(1, 0, 4, 3));
}

#[test]
fn heredoc_with_flags_and_continuation() {
    let dockerfile = parse("RUN --mount=type=cache,target=/cache \\\n  <<EOF\nls\nEOF\n");
    let run = dockerfile.runs()[0];
    assert_eq!(run.flags().len(), 1);
    let docs = run.heredocs();
    assert_eq!(docs[0].operator_range(), range(1, 2, 1, 4));
    assert_eq!(docs[0].content_range(), Some(range(2, 0, 2, 2)));
    assert_eq!(docs[0].delimiter_range(), Some(range(3, 0, 3, 3)));
}

#[test]
fn onbuild_trigger_heredoc() {
    let dockerfile = parse("ONBUILD RUN <<EOF\necho\nEOF\n");
    let onbuild = &dockerfile.instructions()[0];
    assert!(onbuild.is(Keyword::Onbuild));
    assert!(onbuild.heredocs().is_empty());

    let trigger = onbuild.trigger();
    let docs = trigger.map(|t| t.heredocs().to_vec()).unwrap_or_default();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content_range(), Some(range(1, 0, 1, 4)));
    assert_eq!(docs[0].delimiter_range(), Some(range(2, 0, 2, 3)));
}

#[test]
fn other_instructions_ignore_heredoc_syntax() {
    let dockerfile = parse("LABEL a=<<EOF\nUSER root\n");
    assert_eq!(dockerfile.instructions().len(), 2);
    assert!(dockerfile.instructions()[0].heredocs().is_empty());
}
