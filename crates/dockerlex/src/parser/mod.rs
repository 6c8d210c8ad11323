//! Parser module for dockerlex
//!
//! Parsing never fails: malformed input yields a degraded but well-formed
//! model. The work is split into passes over the same text:
//!
//! 1. [`directive`] reads the leading `# name=value` block and picks the
//!    escape character.
//! 2. [`scanner`] splits the rest into comments and raw instructions,
//!    joining continuations and consuming heredoc bodies.
//! 3. The instruction factory below tokenizes each raw instruction and
//!    builds its keyword-specific payload.
//! 4. The document model groups stages and resolves variables.

pub(crate) mod directive;
pub(crate) mod flags;
pub(crate) mod heredoc;
pub(crate) mod image;
pub(crate) mod json;
pub(crate) mod lexer;
pub(crate) mod scanner;
pub mod span;
pub(crate) mod variables;

use crate::ast::{
    Argument, CommandForm, Comment, Component, Dockerfile, EscapeChar, ExecForm, FromImage,
    Healthcheck, Instruction, InstructionKind, JsonArray, Keyword, Onbuild, ParserDirective,
    Property, PropertyList,
};
use crate::document::TextDocument;
use crate::logging_impl::{LogConfig, debug_event, trace_event};

use lexer::{Piece, tokenize, tokenize_properties};
use scanner::RawInstruction;

/// Dockerfile parser.
///
/// ```rust
/// use dockerlex::{Parser, Template};
///
/// let dockerfile = Parser::new().parse("FROM alpine\nRUN echo hi\n");
/// assert_eq!(dockerfile.instructions().len(), 2);
/// assert_eq!(dockerfile.runs()[0].arguments()[1].value(), "hi");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    log_config: LogConfig,
}

impl Parser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`ParserBuilder`] for customized configuration.
    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    pub fn log_config(&self) -> &LogConfig {
        &self.log_config
    }

    /// Parse `text` into a [`Dockerfile`].
    pub fn parse(&self, text: impl Into<String>) -> Dockerfile {
        let document = TextDocument::new(text);
        debug_event!(
            document = %crate::logging_impl::format_document_for_log(
                document.text(),
                &self.log_config
            ),
            "parse started"
        );

        let block = directive::scan_directives(document.text());
        let escape = EscapeChar::try_from(char::from(block.escape)).unwrap_or_default();
        let directives: Vec<ParserDirective> = block
            .directives
            .iter()
            .map(|raw| ParserDirective::new(&document, raw))
            .collect();
        for directive in &directives {
            debug_event!(
                name = %directive.name(),
                value = %crate::logging_impl::sanitize_for_log(directive.value()),
                "parser directive"
            );
        }

        let scan = scanner::scan(document.text(), block.body_start, escape.as_byte());
        let factory = Factory {
            doc: &document,
            escape: escape.as_byte(),
            log_config: &self.log_config,
        };
        let instructions: Vec<Instruction> = scan
            .instructions
            .iter()
            .map(|raw| factory.instruction(raw))
            .collect();
        let comments: Vec<Comment> = scan
            .comments
            .iter()
            .map(|&(start, end)| Comment::new(&document, start, end))
            .collect();

        let dockerfile = Dockerfile::new(document, escape, directives, comments, instructions);
        debug_event!(
            escape = %dockerfile.escape_char(),
            stages = dockerfile.stage_count(),
            "parse finished"
        );
        dockerfile
    }
}

/// Builder for customized [`Parser`] configuration.
#[derive(Debug, Default)]
pub struct ParserBuilder {
    log_config: Option<LogConfig>,
}

impl ParserBuilder {
    /// Set the logging configuration.
    pub fn log_config(mut self, config: LogConfig) -> Self {
        self.log_config = Some(config);
        self
    }

    /// Build the parser.
    pub fn build(self) -> Parser {
        Parser {
            log_config: self.log_config.unwrap_or_default(),
        }
    }
}

/// Turns raw instructions into typed ones.
struct Factory<'a> {
    doc: &'a TextDocument,
    escape: u8,
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    log_config: &'a LogConfig,
}

impl Factory<'_> {
    fn instruction(&self, raw: &RawInstruction) -> Instruction {
        let text = self.doc.text();
        let keyword = raw.name.to_ascii_uppercase();
        let known = keyword.parse::<Keyword>().ok();

        let pieces = match known {
            Some(Keyword::Arg | Keyword::Env | Keyword::Label) => {
                tokenize_properties(text, raw.name_end, raw.end, self.escape, true)
            }
            _ => tokenize(text, raw.name_end, raw.end, self.escape),
        };
        let arguments: Vec<Argument> = pieces
            .iter()
            .cloned()
            .map(|piece| Argument::from_piece(self.doc, piece))
            .collect();

        let kind = match known {
            Some(Keyword::Add) => InstructionKind::Add(self.command_form(raw, &arguments)),
            Some(Keyword::Copy) => InstructionKind::Copy(self.command_form(raw, &arguments)),
            Some(Keyword::Run) => InstructionKind::Run(self.command_form(raw, &arguments)),
            Some(Keyword::Arg) => InstructionKind::Arg(self.declarations(&pieces)),
            Some(Keyword::Env) => InstructionKind::Env(self.legacy_declarations(raw, &pieces)),
            Some(Keyword::Label) => InstructionKind::Label(self.legacy_declarations(raw, &pieces)),
            Some(Keyword::Cmd) => InstructionKind::Cmd(self.exec_form(raw, &arguments)),
            Some(Keyword::Entrypoint) => {
                InstructionKind::Entrypoint(self.exec_form(raw, &arguments))
            }
            Some(Keyword::Shell) => InstructionKind::Shell(self.exec_form(raw, &arguments)),
            Some(Keyword::Volume) => InstructionKind::Volume(self.exec_form(raw, &arguments)),
            Some(Keyword::From) => InstructionKind::From(self.from_image(&arguments)),
            Some(Keyword::Healthcheck) => {
                InstructionKind::Healthcheck(self.healthcheck(raw, &arguments))
            }
            Some(Keyword::Onbuild) => InstructionKind::Onbuild(Onbuild {
                trigger: self.trigger(raw, &arguments),
            }),
            _ => InstructionKind::Generic,
        };

        let variables = arguments
            .iter()
            .flat_map(|arg| variables::scan_variables(self.doc, self.escape, arg.start(), arg.end()))
            .collect();

        Instruction {
            name: raw.name.clone(),
            keyword,
            name_range: self.doc.range(raw.name_start, raw.name_end),
            range: self.doc.range(raw.start, raw.end),
            expanded_arguments: arguments.clone(),
            arguments,
            variables,
            kind,
        }
    }

    fn json_from(&self, first: Option<&Argument>, end: usize) -> JsonArray {
        first
            .map(|arg| json::parse_json(self.doc, self.escape, arg.start(), end))
            .unwrap_or_default()
    }

    fn command_form(&self, raw: &RawInstruction, args: &[Argument]) -> CommandForm {
        let (flags, consumed) = flags::parse_flags(self.doc, args, self.escape);
        CommandForm {
            flags,
            json: self.json_from(args.get(consumed), raw.end),
            heredocs: heredoc::extract(self.doc, self.escape, raw.start, raw.end, args),
        }
    }

    fn exec_form(&self, raw: &RawInstruction, args: &[Argument]) -> ExecForm {
        ExecForm {
            json: self.json_from(args.first(), raw.end),
        }
    }

    fn declarations(&self, pieces: &[Piece]) -> PropertyList {
        let properties: Vec<Property> = pieces
            .iter()
            .map(|piece| Property::from_piece(self.doc, piece))
            .collect();
        self.trace_properties(&properties);
        PropertyList { properties }
    }

    /// ENV and LABEL also accept `KEY value with spaces` when the first
    /// token has no `=`.
    fn legacy_declarations(&self, raw: &RawInstruction, pieces: &[Piece]) -> PropertyList {
        match pieces {
            [name, value, ..] if name.split.is_none() => {
                let value =
                    tokenize_properties(self.doc.text(), value.start, raw.end, self.escape, false);
                let properties = vec![Property::legacy(self.doc, name, value.first())];
                self.trace_properties(&properties);
                PropertyList { properties }
            }
            _ => self.declarations(pieces),
        }
    }

    #[cfg_attr(not(feature = "logging"), allow(unused_variables))]
    fn trace_properties(&self, properties: &[Property]) {
        for property in properties {
            trace_event!(
                name = %property.name(),
                value = %self.log_config.property_value(property.name(), property.value()),
                "declaration"
            );
        }
    }

    fn from_image(&self, args: &[Argument]) -> FromImage {
        let (flags, consumed) = flags::parse_flags(self.doc, args, self.escape);
        let mut from = FromImage {
            flags,
            ..FromImage::default()
        };
        let Some(image) = args.get(consumed) else {
            return from;
        };

        let parts = image::split_image(image.value());
        let component = |(start, end): (usize, usize)| Component {
            value: image.value()[start..end].to_string(),
            range: image.range_of(self.doc, start, end),
        };
        from.registry = parts.registry.map(component);
        from.image_name = Some(component(parts.name));
        from.tag = parts.tag.map(component);
        from.digest = parts.digest.map(component);
        from.image = Some(whole(image));

        if let [keyword, stage, ..] = &args[consumed + 1..] {
            if keyword.value().eq_ignore_ascii_case("AS") {
                from.build_stage = Some(whole(stage));
            }
        }
        from
    }

    fn healthcheck(&self, raw: &RawInstruction, args: &[Argument]) -> Healthcheck {
        let (flags, consumed) = flags::parse_flags(self.doc, args, self.escape);
        let subcommand = args.get(consumed);
        let json = match subcommand {
            Some(sub) if sub.value().eq_ignore_ascii_case("CMD") => {
                self.json_from(args.get(consumed + 1), raw.end)
            }
            _ => JsonArray::default(),
        };
        Healthcheck {
            flags,
            subcommand: subcommand.map(whole),
            json,
        }
    }

    /// The instruction after ONBUILD, parsed as if it started there.
    fn trigger(&self, raw: &RawInstruction, args: &[Argument]) -> Option<Box<Instruction>> {
        let first = args.first()?;
        let nested = RawInstruction {
            name: first.value().to_string(),
            name_start: first.start(),
            name_end: first.end(),
            start: first.start(),
            end: raw.end,
        };
        Some(Box::new(self.instruction(&nested)))
    }
}

fn whole(arg: &Argument) -> Component {
    Component {
        value: arg.value().to_string(),
        range: arg.range(),
    }
}
