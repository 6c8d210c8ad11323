//! Variable references, scoping and expansion

use dockerlex::{Dockerfile, Position, Range, Resolution, Template, VariableSource, parse};
use pretty_assertions::assert_eq;

fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
    Range::new(Position::new(sl, sc), Position::new(el, ec))
}

fn expanded(dockerfile: &Dockerfile, index: usize) -> Vec<String> {
    dockerfile.instructions()[index]
        .expanded_arguments()
        .iter()
        .map(|a| a.value().to_string())
        .collect()
}

fn with_value(value: &str) -> Resolution {
    Resolution::DeclaredWithValue(value.to_string())
}

#[test]
fn env_shadows_arg() {
    let dockerfile = parse("FROM alpine\nARG a=arg\nENV a=env\nRUN echo $a\n");
    let run = dockerfile.runs()[0];
    let variable = &run.variables()[0];
    assert_eq!(variable.resolution(), &with_value("env"));
    assert_eq!(variable.source(), Some(VariableSource::Environment));
    assert!(variable.is_environment_variable());
    assert_eq!(dockerfile.resolve_variable("a", 3), with_value("env"));
}

#[test]
fn arg_only_is_build_variable() {
    let dockerfile = parse("FROM alpine\nARG version=1\nRUN echo ${version}\n");
    let variable = &dockerfile.runs()[0].variables()[0];
    assert!(variable.is_build_variable());
    assert_eq!(variable.value(), Some("1"));
    assert_eq!(variable.range(), range(2, 9, 2, 19));
    assert_eq!(variable.name_range(), range(2, 11, 2, 18));
}

#[test]
fn declarations_apply_only_to_later_lines() {
    let dockerfile = parse("FROM alpine\nRUN echo $a\nARG a=1\nRUN echo $a\n");
    assert_eq!(dockerfile.resolve_variable("a", 1), Resolution::Undeclared);
    assert_eq!(dockerfile.resolve_variable("a", 2), Resolution::Undeclared);
    assert_eq!(dockerfile.resolve_variable("a", 3), with_value("1"));
    assert_eq!(expanded(&dockerfile, 1), ["echo", "$a"]);
    assert_eq!(expanded(&dockerfile, 3), ["echo", "1"]);
}

#[test]
fn newest_declaration_wins() {
    let dockerfile = parse("FROM alpine\nARG a=1\nARG a=2 a=3\nRUN echo $a\n");
    assert_eq!(dockerfile.resolve_variable("a", 3), with_value("3"));
}

#[test]
fn global_args_are_visible_to_from_lines_only() {
    let text = "ARG tag=3.19\nFROM alpine:$tag\nRUN echo $tag\n";
    let dockerfile = parse(text);

    assert_eq!(dockerfile.resolve_variable("tag", 1), with_value("3.19"));
    assert_eq!(dockerfile.resolve_variable("tag", 2), Resolution::Undeclared);

    let from = dockerfile.froms()[0];
    assert_eq!(expanded(&dockerfile, 1), ["alpine:3.19"]);
    assert_eq!(from.variables()[0].source(), Some(VariableSource::Build));
    assert_eq!(expanded(&dockerfile, 2), ["echo", "$tag"]);
}

#[test]
fn redeclared_global_arg_inherits_value() {
    let dockerfile = parse("ARG tag=1\nFROM alpine\nARG tag\nRUN echo $tag\n");
    assert_eq!(dockerfile.resolve_variable("tag", 3), with_value("1"));
    assert_eq!(dockerfile.stages()[0].resolve_variable("tag", 3), with_value("1"));
    assert_eq!(expanded(&dockerfile, 3), ["echo", "1"]);
    assert_eq!(
        dockerfile.runs()[0].variables()[0].source(),
        Some(VariableSource::Build)
    );
}

#[test]
fn redeclared_arg_inherits_newest_global_value() {
    let text = "ARG tag=1\nARG tag=2\nFROM alpine\nARG tag\nRUN echo $tag\n";
    let dockerfile = parse(text);
    assert_eq!(dockerfile.resolve_variable("tag", 4), with_value("2"));
}

#[test]
fn redeclared_arg_without_global_value_stays_unset() {
    let text = "ARG tag\nARG other=1\nFROM alpine\nARG tag\nARG other\nRUN echo $tag\n";
    let dockerfile = parse(text);
    assert_eq!(dockerfile.resolve_variable("tag", 5), Resolution::DeclaredNoValue);
    assert_eq!(dockerfile.resolve_variable("other", 5), with_value("1"));
    assert_eq!(expanded(&dockerfile, 5), ["echo", "$tag"]);
}

#[test]
fn in_stage_value_overrides_global() {
    let dockerfile = parse("ARG tag=1\nFROM alpine\nARG tag=2\nRUN echo $tag\n");
    assert_eq!(dockerfile.resolve_variable("tag", 3), with_value("2"));
}

#[test]
fn each_stage_has_its_own_scope() {
    let text = "FROM alpine AS one\nENV a=1\nFROM alpine AS two\nRUN echo $a\n";
    let dockerfile = parse(text);
    assert_eq!(dockerfile.resolve_variable("a", 3), Resolution::Undeclared);

    let stages = dockerfile.stages();
    assert_eq!(stages[0].resolve_variable("a", 2), with_value("1"));
    assert_eq!(stages[1].resolve_variable("a", 3), Resolution::Undeclared);
}

#[test]
fn out_of_range_line_is_undeclared() {
    let dockerfile = parse("ARG a=1\nFROM alpine\n");
    assert_eq!(dockerfile.resolve_variable("a", 1), with_value("1"));
    assert_eq!(dockerfile.resolve_variable("a", 99), Resolution::Undeclared);
    assert!(dockerfile.available_variables(99).is_empty());
}

#[test]
fn default_and_alternative_modifiers() {
    let text = "FROM alpine\nARG set=x\nARG empty=\nRUN echo ${set:+yes} ${unset:-no} ${empty:-fallback}\n";
    let dockerfile = parse(text);
    assert_eq!(expanded(&dockerfile, 3), ["echo", "yes", "no", "fallback"]);

    let variables = dockerfile.runs()[0].variables();
    assert_eq!(variables[0].modifier(), Some("+"));
    assert_eq!(variables[0].substitution(), Some("yes"));
    assert_eq!(variables[0].modifier_range(), Some(range(3, 15, 3, 16)));
    assert_eq!(variables[0].substitution_range(), Some(range(3, 16, 3, 19)));
}

#[test]
fn empty_modifier() {
    let dockerfile = parse("RUN echo ${a:}\n");
    let variable = &dockerfile.instructions()[0].variables()[0];
    assert_eq!(variable.name(), "a");
    assert_eq!(variable.modifier(), Some(""));
    assert_eq!(variable.substitution(), None);
}

#[test]
fn escaped_dollar_is_not_a_variable() {
    let dockerfile = parse("ARG a=1\nRUN echo \\$a $a\n");
    let run = &dockerfile.instructions()[1];
    assert_eq!(run.variables().len(), 1);
    assert_eq!(run.variables()[0].range(), range(1, 12, 1, 14));
    assert_eq!(expanded(&dockerfile, 1), ["echo", "$a", "1"]);
}

#[test]
fn unbalanced_brace_stops_scanning() {
    let dockerfile = parse("RUN echo ${a$b\n");
    assert!(dockerfile.instructions()[0].variables().is_empty());
}

#[test]
fn variable_name_split_by_continuation() {
    let dockerfile = parse("ARG abc=1\nRUN echo $a\\\nbc\n");
    let variable = &dockerfile.instructions()[1].variables()[0];
    assert_eq!(variable.name(), "abc");
    assert_eq!(variable.range(), range(1, 9, 2, 2));
    assert_eq!(expanded(&dockerfile, 1), ["echo", "1"]);
}

#[test]
fn available_variables_in_declaration_order() {
    let text = "ARG g\nFROM alpine\nARG x\nENV y=1 x=2\nRUN echo\n";
    let dockerfile = parse(text);
    assert_eq!(dockerfile.available_variables(1), ["g"]);
    assert_eq!(dockerfile.available_variables(4), ["x", "y"]);
    assert_eq!(dockerfile.stages()[0].available_variables(3), ["x"]);
}

#[test]
fn onbuild_trigger_variables_are_resolved() {
    let dockerfile = parse("FROM alpine\nARG dir=/app\nONBUILD WORKDIR $dir\n");
    let onbuild = dockerfile.onbuilds()[0];
    let trigger = onbuild.trigger();
    assert_eq!(
        trigger.map(|t| t.variables()[0].resolution().clone()),
        Some(with_value("/app"))
    );
    assert_eq!(
        trigger.map(|t| t.expanded_arguments()[0].value().to_string()),
        Some("/app".to_string())
    );
}

#[test]
fn resolved_value_is_logical_value() {
    let dockerfile = parse("FROM alpine\nENV greeting=\"hello world\"\nRUN echo $greeting\n");
    assert_eq!(dockerfile.resolve_variable("greeting", 2), with_value("hello world"));
}
