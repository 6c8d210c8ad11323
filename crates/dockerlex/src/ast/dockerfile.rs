//! The parsed document: directives, comments, instructions and stages, with
//! variable resolution by build-stage scope.

use serde::Serialize;

use super::stage::{ImageTemplate, Stage, Template};
use super::{
    Comment, EscapeChar, Instruction, InstructionKind, Keyword, ParserDirective, Resolution,
    VariableSource,
};
use crate::document::TextDocument;
use crate::logging_impl::debug_event;
use crate::parser::span::{Position, Range};
use crate::parser::variables::expand;

/// Which declarations a lookup may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Before the first FROM, and FROM lines themselves: global ARGs only
    Initial,
    /// Inside the stage with this index
    Stage(usize),
}

/// A parsed Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dockerfile {
    #[serde(skip)]
    document: TextDocument,
    escape: EscapeChar,
    directives: Vec<ParserDirective>,
    comments: Vec<Comment>,
    instructions: Vec<Instruction>,
    stages: Vec<ImageTemplate>,
    /// Number of instructions before the first FROM
    #[serde(skip)]
    initial_len: usize,
}

impl Dockerfile {
    pub(crate) fn new(
        document: TextDocument,
        escape: EscapeChar,
        directives: Vec<ParserDirective>,
        comments: Vec<Comment>,
        instructions: Vec<Instruction>,
    ) -> Self {
        let initial_len = instructions
            .iter()
            .position(|i| i.is(Keyword::From))
            .unwrap_or(instructions.len());
        let stages = stage_templates(&instructions, &comments, initial_len);
        debug_event!(
            instructions = instructions.len(),
            comments = comments.len(),
            stages = stages.len(),
            "document model built"
        );

        let mut dockerfile = Self {
            document,
            escape,
            directives,
            comments,
            instructions,
            stages,
            initial_len,
        };
        dockerfile.resolve_variables();
        dockerfile
    }

    /// Fill in variable resolutions and expanded arguments.
    fn resolve_variables(&mut self) {
        let resolutions: Vec<Vec<(Resolution, Option<VariableSource>)>> = self
            .instructions
            .iter()
            .enumerate()
            .map(|(index, instruction)| {
                let scope = self.scope_of_instruction(index);
                let line = instruction.start_line();
                referenced_names(instruction)
                    .into_iter()
                    .map(|name| self.resolve_in(scope, name, line))
                    .collect()
            })
            .collect();

        for (instruction, resolved) in self.instructions.iter_mut().zip(resolutions) {
            apply_resolutions(instruction, &mut resolved.into_iter());
        }
    }

    fn scope_of_instruction(&self, index: usize) -> Scope {
        if index < self.initial_len || self.instructions[index].is(Keyword::From) {
            return Scope::Initial;
        }
        self.stages
            .iter()
            .rposition(|s| s.instructions.start <= index)
            .map_or(Scope::Initial, Scope::Stage)
    }

    fn scope_of_line(&self, line: u32) -> Scope {
        let in_from = self
            .froms()
            .iter()
            .any(|f| f.range().start.line <= line && line <= f.range().end.line);
        if in_from {
            return Scope::Initial;
        }
        self.stages
            .iter()
            .rposition(|s| s.range.start.line <= line)
            .map_or(Scope::Initial, Scope::Stage)
    }

    fn scope_instructions(&self, scope: Scope) -> &[Instruction] {
        match scope {
            Scope::Initial => &self.instructions[..self.initial_len],
            Scope::Stage(index) => &self.instructions[self.stages[index].instructions.clone()],
        }
    }

    /// Look `name` up for an instruction starting on `line`: ENV first, then
    /// ARG, newest declaration first. The initial scope only has ARGs. A
    /// value-less ARG in a stage takes the value of the global ARG it
    /// re-declares.
    pub(crate) fn resolve_in(
        &self,
        scope: Scope,
        name: &str,
        line: u32,
    ) -> (Resolution, Option<VariableSource>) {
        let instructions = self.scope_instructions(scope);
        if scope != Scope::Initial {
            if let Some(found) = declared(instructions, Keyword::Env, name, line) {
                return (found, Some(VariableSource::Environment));
            }
        }
        match declared(instructions, Keyword::Arg, name, line) {
            Some(Resolution::DeclaredNoValue) if scope != Scope::Initial => {
                let inherited = declared(self.initial_instructions(), Keyword::Arg, name, line)
                    .filter(|r| matches!(r, Resolution::DeclaredWithValue(_)))
                    .unwrap_or(Resolution::DeclaredNoValue);
                (inherited, Some(VariableSource::Build))
            }
            Some(found) => (found, Some(VariableSource::Build)),
            None => (Resolution::Undeclared, None),
        }
    }

    pub(crate) fn available_in(&self, scope: Scope, line: u32) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for instruction in self.scope_instructions(scope) {
            if instruction.start_line() >= line {
                break;
            }
            let visible = instruction.is(Keyword::Arg)
                || (scope != Scope::Initial && instruction.is(Keyword::Env));
            if !visible {
                continue;
            }
            for property in instruction.properties() {
                if !names.iter().any(|n| n == property.name()) {
                    names.push(property.name().to_string());
                }
            }
        }
        names
    }

    /// Resolve `name` as seen by an instruction starting on `line`.
    ///
    /// Lines before the first FROM, and the lines of FROM instructions, see
    /// only the global ARGs. Lines past the end of the document see nothing.
    pub fn resolve_variable(&self, name: &str, line: u32) -> Resolution {
        if line >= self.document.line_count() {
            return Resolution::Undeclared;
        }
        self.resolve_in(self.scope_of_line(line), name, line).0
    }

    /// Variable names visible on `line`, in declaration order.
    pub fn available_variables(&self, line: u32) -> Vec<String> {
        if line >= self.document.line_count() {
            return Vec::new();
        }
        self.available_in(self.scope_of_line(line), line)
    }

    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn escape_char(&self) -> EscapeChar {
        self.escape
    }

    pub fn directives(&self) -> &[ParserDirective] {
        &self.directives
    }

    /// Whole-document range.
    pub fn range(&self) -> Range {
        self.document.range(0, self.document.len())
    }

    /// Instructions before the first FROM.
    pub fn initial_instructions(&self) -> &[Instruction] {
        &self.instructions[..self.initial_len]
    }

    pub fn stages(&self) -> Vec<Stage<'_>> {
        (0..self.stages.len()).map(|index| self.stage(index)).collect()
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    fn stage(&self, index: usize) -> Stage<'_> {
        Stage {
            dockerfile: self,
            index,
        }
    }

    /// Stage with the given `AS` name (case-insensitive).
    pub fn stage_named(&self, name: &str) -> Option<Stage<'_>> {
        self.stages()
            .into_iter()
            .find(|s| s.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    /// Stage whose range contains `pos`.
    pub fn containing_stage(&self, pos: Position) -> Option<Stage<'_>> {
        self.stages().into_iter().find(|s| s.contains(pos))
    }

    pub(crate) fn stage_templates(&self) -> &[ImageTemplate] {
        &self.stages
    }
}

impl Template for Dockerfile {
    fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

/// Newest declaration of `name` by `keyword` instructions starting before `line`.
fn declared(
    instructions: &[Instruction],
    keyword: Keyword,
    name: &str,
    line: u32,
) -> Option<Resolution> {
    instructions
        .iter()
        .rev()
        .filter(|i| i.start_line() < line && i.is(keyword))
        .flat_map(|i| i.properties().iter().rev())
        .find(|p| p.name() == name)
        .map(|p| match p.value() {
            Some(value) => Resolution::DeclaredWithValue(value.to_string()),
            None => Resolution::DeclaredNoValue,
        })
}

/// Names of every reference in an instruction and, after them, in its
/// ONBUILD trigger.
fn referenced_names(instruction: &Instruction) -> Vec<&str> {
    let mut names: Vec<&str> = instruction.variables.iter().map(|v| v.name()).collect();
    if let Some(trigger) = instruction.trigger() {
        names.extend(referenced_names(trigger));
    }
    names
}

fn apply_resolutions(
    instruction: &mut Instruction,
    resolved: &mut impl Iterator<Item = (Resolution, Option<VariableSource>)>,
) {
    for variable in &mut instruction.variables {
        if let Some((resolution, source)) = resolved.next() {
            variable.resolution = resolution;
            variable.source = source;
        }
    }
    instruction.expanded_arguments = instruction
        .arguments
        .iter()
        .map(|arg| expand(arg, &instruction.variables))
        .collect();
    if let InstructionKind::Onbuild(onbuild) = &mut instruction.kind {
        if let Some(trigger) = onbuild.trigger.as_deref_mut() {
            apply_resolutions(trigger, resolved);
        }
    }
}

/// Group instructions and comments into stages, one per FROM.
fn stage_templates(
    instructions: &[Instruction],
    comments: &[Comment],
    initial_len: usize,
) -> Vec<ImageTemplate> {
    let froms: Vec<usize> = (initial_len..instructions.len())
        .filter(|&i| instructions[i].is(Keyword::From))
        .collect();

    froms
        .iter()
        .enumerate()
        .map(|(n, &from)| {
            let next = froms.get(n + 1).copied().unwrap_or(instructions.len());
            let start = instructions[from].range().start;
            let limit = instructions.get(next).map(|i| i.range().start);
            let first_comment = comments.partition_point(|c| c.range().start < start);
            let last_comment = match limit {
                Some(limit) => comments.partition_point(|c| c.range().start < limit),
                None => comments.len(),
            };

            let mut end = instructions[next - 1].range().end;
            if let Some(comment) = comments[first_comment..last_comment].last() {
                end = end.max(comment.range().end);
            }
            debug_event!(stage = n, instructions = next - from, "build stage");
            ImageTemplate {
                range: Range::new(start, end),
                instructions: from..next,
                comments: first_comment..last_comment,
            }
        })
        .collect()
}
