//! Syntax tree types
//!
//! Every node is immutable once parsed and reports zero-based ranges.

mod argument;
mod comment;
mod directive;
pub(crate) mod dockerfile;
mod flag;
mod heredoc;
mod instruction;
mod json;
pub(crate) mod kinds;
mod property;
pub(crate) mod stage;
mod variable;

pub use argument::Argument;
pub use comment::Comment;
pub use directive::{Directive, EscapeChar, ParserDirective};
pub use dockerfile::Dockerfile;
pub use flag::{Flag, FlagOption};
pub use heredoc::Heredoc;
pub use instruction::{Instruction, InstructionKind, Keyword};
pub use json::JsonArray;
pub use kinds::{
    CommandForm, Component, ExecForm, FromImage, HasFlags, HasHeredocs, HasJsonArgs,
    HasProperties, Healthcheck, Onbuild, PropertyList,
};
pub use property::Property;
pub use stage::{ImageTemplate, Stage, Template};
pub use variable::{Resolution, Variable, VariableSource};
