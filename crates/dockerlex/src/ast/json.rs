use serde::Serialize;

use super::Argument;
use crate::parser::span::Range;

/// Exec-form arguments: `["executable", "param", ...]`.
///
/// Holds whatever prefix of the array was recognized; check
/// [`JsonArray::is_valid`] before treating the instruction as exec form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JsonArray {
    pub(crate) open: Option<Range>,
    pub(crate) strings: Vec<Argument>,
    pub(crate) close: Option<Range>,
    /// Only whitespace follows the closing bracket
    #[serde(skip)]
    pub(crate) clean_tail: bool,
}

impl JsonArray {
    pub fn opening_bracket(&self) -> Option<Range> {
        self.open
    }

    pub fn closing_bracket(&self) -> Option<Range> {
        self.close
    }

    /// The string elements; values are unescaped, raw text keeps the quotes.
    pub fn arguments(&self) -> &[Argument] {
        &self.strings
    }

    pub fn is_valid(&self) -> bool {
        self.open.is_some() && self.close.is_some() && self.clean_tail
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_none()
    }
}
