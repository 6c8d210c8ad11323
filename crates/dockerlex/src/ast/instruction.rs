use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::kinds::{
    CommandForm, ExecForm, FromImage, HasFlags, HasHeredocs, HasJsonArgs, HasProperties,
    Healthcheck, Onbuild, PropertyList,
};
use super::{Argument, Flag, Heredoc, Property, Variable};
use crate::error::{Error, Result};
use crate::parser::span::{Position, Range};

/// Dockerfile instruction keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Keyword {
    Add,
    Arg,
    Cmd,
    Copy,
    Entrypoint,
    Env,
    Expose,
    From,
    Healthcheck,
    Label,
    Maintainer,
    Onbuild,
    Run,
    Shell,
    Stopsignal,
    User,
    Volume,
    Workdir,
}

impl Keyword {
    pub const ALL: [Keyword; 18] = [
        Keyword::Add,
        Keyword::Arg,
        Keyword::Cmd,
        Keyword::Copy,
        Keyword::Entrypoint,
        Keyword::Env,
        Keyword::Expose,
        Keyword::From,
        Keyword::Healthcheck,
        Keyword::Label,
        Keyword::Maintainer,
        Keyword::Onbuild,
        Keyword::Run,
        Keyword::Shell,
        Keyword::Stopsignal,
        Keyword::User,
        Keyword::Volume,
        Keyword::Workdir,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Add => "ADD",
            Keyword::Arg => "ARG",
            Keyword::Cmd => "CMD",
            Keyword::Copy => "COPY",
            Keyword::Entrypoint => "ENTRYPOINT",
            Keyword::Env => "ENV",
            Keyword::Expose => "EXPOSE",
            Keyword::From => "FROM",
            Keyword::Healthcheck => "HEALTHCHECK",
            Keyword::Label => "LABEL",
            Keyword::Maintainer => "MAINTAINER",
            Keyword::Onbuild => "ONBUILD",
            Keyword::Run => "RUN",
            Keyword::Shell => "SHELL",
            Keyword::Stopsignal => "STOPSIGNAL",
            Keyword::User => "USER",
            Keyword::Volume => "VOLUME",
            Keyword::Workdir => "WORKDIR",
        }
    }
}

impl FromStr for Keyword {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Keyword::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownKeyword(s.to_string()))
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword-specific payload of an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum InstructionKind {
    Add(CommandForm),
    Copy(CommandForm),
    Run(CommandForm),
    Arg(PropertyList),
    Env(PropertyList),
    Label(PropertyList),
    Cmd(ExecForm),
    Entrypoint(ExecForm),
    Shell(ExecForm),
    Volume(ExecForm),
    From(FromImage),
    Healthcheck(Healthcheck),
    Onbuild(Onbuild),
    /// WORKDIR, EXPOSE, USER, STOPSIGNAL, MAINTAINER and unknown keywords
    Generic,
}

/// One instruction: keyword, arguments and kind-specific structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub(crate) name: String,
    pub(crate) keyword: String,
    pub(crate) name_range: Range,
    pub(crate) range: Range,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) expanded_arguments: Vec<Argument>,
    pub(crate) variables: Vec<Variable>,
    pub(crate) kind: InstructionKind,
}

impl Instruction {
    /// Name as written, continuations removed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uppercased name.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The known keyword, `None` for unrecognized instructions.
    pub fn known_keyword(&self) -> Option<Keyword> {
        self.keyword.parse().ok()
    }

    pub fn is(&self, keyword: Keyword) -> bool {
        self.keyword == keyword.as_str()
    }

    pub fn name_range(&self) -> Range {
        self.name_range
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.range.contains(pos)
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Arguments with resolved variable references substituted.
    pub fn expanded_arguments(&self) -> &[Argument] {
        &self.expanded_arguments
    }

    /// Variable references in the arguments, resolved against the
    /// declarations visible at this instruction.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn kind(&self) -> &InstructionKind {
        &self.kind
    }

    pub fn as_flags(&self) -> Option<&dyn HasFlags> {
        match &self.kind {
            InstructionKind::Add(c) | InstructionKind::Copy(c) | InstructionKind::Run(c) => Some(c),
            InstructionKind::From(f) => Some(f),
            InstructionKind::Healthcheck(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_properties(&self) -> Option<&dyn HasProperties> {
        match &self.kind {
            InstructionKind::Arg(p) | InstructionKind::Env(p) | InstructionKind::Label(p) => {
                Some(p)
            }
            _ => None,
        }
    }

    pub fn as_json_args(&self) -> Option<&dyn HasJsonArgs> {
        match &self.kind {
            InstructionKind::Add(c) | InstructionKind::Copy(c) | InstructionKind::Run(c) => Some(c),
            InstructionKind::Cmd(e)
            | InstructionKind::Entrypoint(e)
            | InstructionKind::Shell(e)
            | InstructionKind::Volume(e) => Some(e),
            InstructionKind::Healthcheck(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_heredocs(&self) -> Option<&dyn HasHeredocs> {
        match &self.kind {
            InstructionKind::Add(c) | InstructionKind::Copy(c) | InstructionKind::Run(c) => Some(c),
            _ => None,
        }
    }

    /// Leading flags; empty for instructions without flag support.
    pub fn flags(&self) -> &[Flag] {
        self.as_flags().map(|f| f.flags()).unwrap_or_default()
    }

    pub fn flag(&self, name: &str) -> Option<&Flag> {
        self.as_flags().and_then(|f| f.flag(name))
    }

    /// ARG/ENV/LABEL declarations; empty for other instructions.
    pub fn properties(&self) -> &[Property] {
        self.as_properties()
            .map(|p| p.properties())
            .unwrap_or_default()
    }

    pub fn heredocs(&self) -> &[Heredoc] {
        self.as_heredocs()
            .map(|h| h.heredocs())
            .unwrap_or_default()
    }

    pub fn from_image(&self) -> Option<&FromImage> {
        match &self.kind {
            InstructionKind::From(f) => Some(f),
            _ => None,
        }
    }

    pub fn healthcheck(&self) -> Option<&Healthcheck> {
        match &self.kind {
            InstructionKind::Healthcheck(h) => Some(h),
            _ => None,
        }
    }

    /// Trigger of an ONBUILD instruction.
    pub fn trigger(&self) -> Option<&Instruction> {
        match &self.kind {
            InstructionKind::Onbuild(o) => o.trigger(),
            _ => None,
        }
    }

    pub(crate) fn start_line(&self) -> u32 {
        self.range.start.line
    }
}
