//! Build stages and the instruction-container view shared with the document.

use std::ops::Range as Span;

use serde::Serialize;

use super::dockerfile::{Dockerfile, Scope};
use super::{Comment, Instruction, Keyword, Resolution};
use crate::parser::span::{Position, Range};

/// A container of instructions and comments: the whole document or one
/// build stage.
pub trait Template {
    fn instructions(&self) -> &[Instruction];

    fn comments(&self) -> &[Comment];

    fn instructions_of(&self, keyword: Keyword) -> Vec<&Instruction> {
        self.instructions()
            .iter()
            .filter(|i| i.is(keyword))
            .collect()
    }

    /// Instruction whose range contains `pos`.
    fn instruction_at(&self, pos: Position) -> Option<&Instruction> {
        self.instructions().iter().find(|i| i.contains(pos))
    }

    fn args(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::Arg)
    }

    fn envs(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::Env)
    }

    fn labels(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::Label)
    }

    fn froms(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::From)
    }

    fn runs(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::Run)
    }

    fn copies(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::Copy)
    }

    fn cmds(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::Cmd)
    }

    fn entrypoints(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::Entrypoint)
    }

    fn healthchecks(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::Healthcheck)
    }

    fn onbuilds(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::Onbuild)
    }

    fn workdirs(&self) -> Vec<&Instruction> {
        self.instructions_of(Keyword::Workdir)
    }
}

/// Where a build stage lives in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageTemplate {
    pub(crate) range: Range,
    /// Indexes into the document's instructions
    pub(crate) instructions: Span<usize>,
    /// Indexes into the document's comments
    pub(crate) comments: Span<usize>,
}

/// One build stage: a FROM and everything up to the next FROM.
#[derive(Debug, Clone, Copy)]
pub struct Stage<'a> {
    pub(crate) dockerfile: &'a Dockerfile,
    pub(crate) index: usize,
}

impl<'a> Stage<'a> {
    fn template(&self) -> &'a ImageTemplate {
        &self.dockerfile.stage_templates()[self.index]
    }

    /// Position of the stage among the document's stages.
    pub fn index(&self) -> usize {
        self.index
    }

    /// From the FROM keyword to the end of the stage's last line of content.
    pub fn range(&self) -> Range {
        self.template().range
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.range().contains(pos)
    }

    /// The stage's FROM instruction.
    pub fn from(&self) -> &'a Instruction {
        &self.dockerfile.instructions()[self.template().instructions.start]
    }

    /// Name given with `AS`.
    pub fn name(&self) -> Option<&'a str> {
        self.from()
            .from_image()
            .and_then(|f| f.build_stage())
            .map(|c| c.value())
    }

    /// Resolve `name` as seen by an instruction starting on `line`.
    pub fn resolve_variable(&self, name: &str, line: u32) -> Resolution {
        self.dockerfile
            .resolve_in(Scope::Stage(self.index), name, line)
            .0
    }

    /// ARG and ENV names declared before `line`, in declaration order.
    pub fn available_variables(&self, line: u32) -> Vec<String> {
        self.dockerfile
            .available_in(Scope::Stage(self.index), line)
    }

    /// The earlier stage this one builds on, matched by `AS` name.
    pub fn parent(&self) -> Option<Stage<'a>> {
        let base = self.from().from_image()?.image()?.value();
        (0..self.index)
            .rev()
            .map(|index| Stage {
                dockerfile: self.dockerfile,
                index,
            })
            .find(|stage| stage.name().is_some_and(|n| n.eq_ignore_ascii_case(base)))
    }

    /// Ancestors, nearest first.
    pub fn hierarchy(&self) -> Vec<Stage<'a>> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(stage) = current {
            current = stage.parent();
            ancestors.push(stage);
        }
        ancestors
    }

    /// Absolute directories set by WORKDIR along the stage hierarchy, in the
    /// order they are first reached.
    pub fn available_working_directories(&self) -> Vec<String> {
        let mut chain = self.hierarchy();
        chain.reverse();
        chain.push(*self);

        let mut cwd = String::from("/");
        let mut dirs: Vec<String> = Vec::new();
        for stage in chain {
            for workdir in stage.workdirs() {
                let Some(path) = workdir.expanded_arguments().first() else {
                    continue;
                };
                cwd = join_path(&cwd, path.value());
                if !dirs.contains(&cwd) {
                    dirs.push(cwd.clone());
                }
            }
        }
        dirs
    }
}

impl Template for Stage<'_> {
    fn instructions(&self) -> &[Instruction] {
        &self.dockerfile.instructions()[self.template().instructions.clone()]
    }

    fn comments(&self) -> &[Comment] {
        &self.dockerfile.comments()[self.template().comments.clone()]
    }
}

/// Apply `path` to `cwd` the way WORKDIR does and normalize the result.
pub(crate) fn join_path(cwd: &str, path: &str) -> String {
    let joined = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("{cwd}/{path}")
    };
    let mut parts: Vec<&str> = Vec::new();
    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}
