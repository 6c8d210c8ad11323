//! Build stages, hierarchy and working directories

use dockerlex::{Keyword, Position, Range, Template, parse};
use pretty_assertions::assert_eq;

fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
    Range::new(Position::new(sl, sc), Position::new(el, ec))
}

const MULTI_STAGE: &str = "\
ARG base=alpine
FROM $base AS base
WORKDIR /app
# shared setup
FROM base AS build
WORKDIR src
WORKDIR ../lib
RUN make
FROM build
WORKDIR /opt
";

#[test]
fn stages_split_at_from() {
    let dockerfile = parse(MULTI_STAGE);
    assert_eq!(dockerfile.initial_instructions().len(), 1);
    assert!(dockerfile.initial_instructions()[0].is(Keyword::Arg));

    let stages = dockerfile.stages();
    assert_eq!(stages.len(), 3);
    assert_eq!(stages[0].instructions().len(), 2);
    assert_eq!(stages[1].instructions().len(), 4);
    assert_eq!(stages[2].instructions().len(), 2);
    assert_eq!(stages[0].comments().len(), 1);
    assert!(stages[1].comments().is_empty());
}

#[test]
fn stage_ranges_include_trailing_comments() {
    let dockerfile = parse(MULTI_STAGE);
    let stages = dockerfile.stages();
    assert_eq!(stages[0].range(), range(1, 0, 3, 14));
    assert_eq!(stages[1].range(), range(4, 0, 7, 8));
    assert_eq!(stages[2].range(), range(8, 0, 9, 12));
}

#[test]
fn containing_stage_by_position() {
    let dockerfile = parse(MULTI_STAGE);
    let index = |line, character| {
        dockerfile
            .containing_stage(Position::new(line, character))
            .map(|s| s.index())
    };
    assert_eq!(index(0, 3), None);
    assert_eq!(index(2, 5), Some(0));
    assert_eq!(index(5, 0), Some(1));
    assert_eq!(index(9, 12), Some(2));
    assert_eq!(index(9, 13), None);
}

#[test]
fn stage_names_and_lookup() {
    let dockerfile = parse(MULTI_STAGE);
    let names: Vec<Option<&str>> = dockerfile.stages().iter().map(|s| s.name()).collect();
    assert_eq!(names, [Some("base"), Some("build"), None]);
    assert_eq!(dockerfile.stage_named("BUILD").map(|s| s.index()), Some(1));
    assert!(dockerfile.stage_named("missing").is_none());
}

#[test]
fn hierarchy_follows_base_names() {
    let dockerfile = parse(MULTI_STAGE);
    let stages = dockerfile.stages();
    let ancestors: Vec<usize> = stages[2].hierarchy().iter().map(|s| s.index()).collect();
    assert_eq!(ancestors, [1, 0]);
    assert_eq!(stages[1].parent().map(|s| s.index()), Some(0));
    assert!(stages[0].parent().is_none());
}

#[test]
fn working_directories_along_hierarchy() {
    let dockerfile = parse(MULTI_STAGE);
    let stages = dockerfile.stages();
    assert_eq!(stages[0].available_working_directories(), ["/app"]);
    assert_eq!(
        stages[1].available_working_directories(),
        ["/app", "/app/src", "/app/lib"]
    );
    assert_eq!(
        stages[2].available_working_directories(),
        ["/app", "/app/src", "/app/lib", "/opt"]
    );
}

#[test]
fn working_directories_use_expanded_values() {
    let dockerfile = parse("FROM alpine\nENV root=/srv\nWORKDIR ${root}/www\nWORKDIR /srv/www\n");
    let stage = dockerfile.stages()[0];
    assert_eq!(stage.available_working_directories(), ["/srv/www"]);
}

#[test]
fn stage_template_queries() {
    let dockerfile = parse(MULTI_STAGE);
    let build = dockerfile.stages()[1];
    assert_eq!(build.from().range(), range(4, 0, 4, 18));
    assert_eq!(build.workdirs().len(), 2);
    assert_eq!(build.runs().len(), 1);
    assert_eq!(
        build.instruction_at(Position::new(7, 2)).map(|i| i.keyword()),
        Some("RUN")
    );
    assert_eq!(dockerfile.workdirs().len(), 4);
}

#[test]
fn from_with_variable_resolves_against_global_args() {
    let dockerfile = parse(MULTI_STAGE);
    let from = dockerfile.stages()[0].from();
    assert_eq!(from.expanded_arguments()[0].value(), "alpine");
    assert_eq!(
        from.from_image().and_then(|f| f.image()).map(|c| c.value()),
        Some("$base")
    );
}

#[test]
fn no_from_means_no_stages() {
    let dockerfile = parse("ARG a\n# comment\nRUN echo\n");
    assert_eq!(dockerfile.stage_count(), 0);
    assert_eq!(dockerfile.initial_instructions().len(), 2);
    assert!(dockerfile.containing_stage(Position::new(2, 0)).is_none());
}
