use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::document::TextDocument;
use crate::error::{Error, Result};
use crate::parser::directive::RawDirective;
use crate::parser::span::Range;

/// Parser directives understood by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Directive {
    Escape,
    Syntax,
}

impl FromStr for Directive {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "escape" => Ok(Directive::Escape),
            "syntax" => Ok(Directive::Syntax),
            _ => Err(Error::UnknownDirective(s.to_string())),
        }
    }
}

/// The character that escapes the next character and joins lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum EscapeChar {
    #[default]
    #[serde(rename = "\\")]
    Backslash,
    #[serde(rename = "`")]
    Backtick,
}

impl EscapeChar {
    pub fn as_char(self) -> char {
        match self {
            EscapeChar::Backslash => '\\',
            EscapeChar::Backtick => '`',
        }
    }

    pub(crate) fn as_byte(self) -> u8 {
        self.as_char() as u8
    }
}

impl TryFrom<char> for EscapeChar {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            '\\' => Ok(EscapeChar::Backslash),
            '`' => Ok(EscapeChar::Backtick),
            other => Err(Error::InvalidEscape(other)),
        }
    }
}

impl fmt::Display for EscapeChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A `# name=value` line from the leading directive block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParserDirective {
    name: String,
    name_range: Range,
    value: String,
    value_range: Range,
    range: Range,
}

impl ParserDirective {
    pub(crate) fn new(doc: &TextDocument, raw: &RawDirective) -> Self {
        Self {
            name: doc.slice(raw.name.0, raw.name.1).to_string(),
            name_range: doc.range(raw.name.0, raw.name.1),
            value: doc.slice(raw.value.0, raw.value.1).to_string(),
            value_range: doc.range(raw.value.0, raw.value.1),
            range: doc.range(raw.span.0, raw.span.1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_range(&self) -> Range {
        self.name_range
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn value_range(&self) -> Range {
        self.value_range
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// The recognized directive, `None` for names the builder ignores.
    pub fn directive(&self) -> Option<Directive> {
        self.name.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_from_str() {
        assert_eq!("ESCAPE".parse::<Directive>(), Ok(Directive::Escape));
        assert_eq!("syntax".parse::<Directive>(), Ok(Directive::Syntax));
        assert_eq!(
            "check".parse::<Directive>(),
            Err(Error::UnknownDirective("check".to_string()))
        );
    }

    #[test]
    fn test_escape_char_conversion() {
        assert_eq!(EscapeChar::try_from('`'), Ok(EscapeChar::Backtick));
        assert_eq!(EscapeChar::try_from('\\'), Ok(EscapeChar::Backslash));
        assert_eq!(EscapeChar::try_from('x'), Err(Error::InvalidEscape('x')));
        assert_eq!(EscapeChar::default().to_string(), "\\");
    }
}
