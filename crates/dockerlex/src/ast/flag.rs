use serde::Serialize;

use crate::parser::span::Range;

/// A `--name[=value]` flag leading an instruction's arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub(crate) name: String,
    pub(crate) name_range: Range,
    pub(crate) value: Option<String>,
    pub(crate) value_range: Option<Range>,
    pub(crate) range: Range,
    pub(crate) options: Vec<FlagOption>,
}

impl Flag {
    /// Name without the leading `--`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_range(&self) -> Range {
        self.name_range
    }

    /// `None` without `=`, `Some("")` when `=` ends the flag.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn value_range(&self) -> Option<Range> {
        self.value_range
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Comma separated `key=value` options of the value, e.g. `--mount`.
    pub fn options(&self) -> &[FlagOption] {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&FlagOption> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// One `key[=value]` segment of a flag value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagOption {
    pub(crate) name: String,
    pub(crate) name_range: Range,
    pub(crate) value: Option<String>,
    pub(crate) value_range: Option<Range>,
    pub(crate) range: Range,
}

impl FlagOption {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_range(&self) -> Range {
        self.name_range
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn value_range(&self) -> Option<Range> {
        self.value_range
    }

    pub fn range(&self) -> Range {
        self.range
    }
}
