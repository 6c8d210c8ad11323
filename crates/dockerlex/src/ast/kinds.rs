//! Instruction payloads and the capability traits they implement.

use serde::Serialize;

use super::{Flag, Heredoc, Instruction, JsonArray, Property};
use crate::parser::span::Range;

/// Instructions that accept leading `--flags`.
pub trait HasFlags {
    fn flags(&self) -> &[Flag];

    /// First flag with the given name (names are case-sensitive).
    fn flag(&self, name: &str) -> Option<&Flag> {
        self.flags().iter().find(|f| f.name() == name)
    }
}

/// Instructions made of `name[=value]` declarations.
pub trait HasProperties {
    fn properties(&self) -> &[Property];

    fn property(&self, name: &str) -> Option<&Property> {
        self.properties().iter().find(|p| p.name() == name)
    }
}

/// Instructions with an exec (JSON array) form.
pub trait HasJsonArgs {
    fn json(&self) -> &JsonArray;

    fn is_exec_form(&self) -> bool {
        self.json().is_valid()
    }
}

/// Instructions that may declare here-documents.
pub trait HasHeredocs {
    fn heredocs(&self) -> &[Heredoc];
}

/// A piece of an argument with its own range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub(crate) value: String,
    pub(crate) range: Range,
}

impl Component {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn range(&self) -> Range {
        self.range
    }
}

/// RUN, COPY and ADD: flags, optional exec form, heredocs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandForm {
    pub(crate) flags: Vec<Flag>,
    pub(crate) json: JsonArray,
    pub(crate) heredocs: Vec<Heredoc>,
}

impl CommandForm {
    /// Value of `--from`, naming a stage or image for COPY.
    pub fn from_stage(&self) -> Option<&str> {
        self.flag("from").and_then(Flag::value)
    }
}

impl HasFlags for CommandForm {
    fn flags(&self) -> &[Flag] {
        &self.flags
    }
}

impl HasJsonArgs for CommandForm {
    fn json(&self) -> &JsonArray {
        &self.json
    }
}

impl HasHeredocs for CommandForm {
    fn heredocs(&self) -> &[Heredoc] {
        &self.heredocs
    }
}

/// ARG, ENV and LABEL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyList {
    pub(crate) properties: Vec<Property>,
}

impl HasProperties for PropertyList {
    fn properties(&self) -> &[Property] {
        &self.properties
    }
}

/// CMD, ENTRYPOINT, SHELL and VOLUME.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecForm {
    pub(crate) json: JsonArray,
}

impl HasJsonArgs for ExecForm {
    fn json(&self) -> &JsonArray {
        &self.json
    }
}

/// FROM: base image reference and optional stage name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FromImage {
    pub(crate) flags: Vec<Flag>,
    pub(crate) image: Option<Component>,
    pub(crate) registry: Option<Component>,
    pub(crate) image_name: Option<Component>,
    pub(crate) tag: Option<Component>,
    pub(crate) digest: Option<Component>,
    pub(crate) build_stage: Option<Component>,
}

impl FromImage {
    /// The whole image argument.
    pub fn image(&self) -> Option<&Component> {
        self.image.as_ref()
    }

    pub fn registry(&self) -> Option<&Component> {
        self.registry.as_ref()
    }

    /// Image name without registry, tag or digest.
    pub fn image_name(&self) -> Option<&Component> {
        self.image_name.as_ref()
    }

    pub fn tag(&self) -> Option<&Component> {
        self.tag.as_ref()
    }

    pub fn digest(&self) -> Option<&Component> {
        self.digest.as_ref()
    }

    /// Name given with `AS`.
    pub fn build_stage(&self) -> Option<&Component> {
        self.build_stage.as_ref()
    }
}

impl HasFlags for FromImage {
    fn flags(&self) -> &[Flag] {
        &self.flags
    }
}

/// HEALTHCHECK: flags, `CMD`/`NONE` subcommand, command after `CMD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Healthcheck {
    pub(crate) flags: Vec<Flag>,
    pub(crate) subcommand: Option<Component>,
    pub(crate) json: JsonArray,
}

impl Healthcheck {
    pub fn subcommand(&self) -> Option<&Component> {
        self.subcommand.as_ref()
    }
}

impl HasFlags for Healthcheck {
    fn flags(&self) -> &[Flag] {
        &self.flags
    }
}

impl HasJsonArgs for Healthcheck {
    fn json(&self) -> &JsonArray {
        &self.json
    }
}

/// ONBUILD: the nested trigger instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Onbuild {
    pub(crate) trigger: Option<Box<Instruction>>,
}

impl Onbuild {
    pub fn trigger(&self) -> Option<&Instruction> {
        self.trigger.as_deref()
    }
}
