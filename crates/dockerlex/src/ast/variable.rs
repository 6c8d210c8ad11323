use serde::Serialize;

use crate::parser::span::Range;

/// What a variable reference resolves to at its instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Resolution {
    /// No ARG or ENV declares the name in scope.
    Undeclared,
    /// Declared without a value (`ARG name`).
    DeclaredNoValue,
    /// Declared with a value (possibly empty).
    DeclaredWithValue(String),
}

impl Resolution {
    pub fn is_declared(&self) -> bool {
        !matches!(self, Resolution::Undeclared)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Resolution::DeclaredWithValue(value) => Some(value),
            _ => None,
        }
    }
}

/// Which kind of declaration a variable resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableSource {
    /// Declared by ARG
    Build,
    /// Declared by ENV
    Environment,
}

/// A `$name` or `${name...}` reference inside an argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub(crate) name: String,
    pub(crate) name_range: Range,
    pub(crate) range: Range,
    pub(crate) modifier: Option<String>,
    pub(crate) modifier_range: Option<Range>,
    pub(crate) substitution: Option<String>,
    pub(crate) substitution_range: Option<Range>,
    pub(crate) resolution: Resolution,
    pub(crate) source: Option<VariableSource>,
    /// Byte span from `$` through the closing brace
    #[serde(skip)]
    pub(crate) span: (usize, usize),
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_range(&self) -> Range {
        self.name_range
    }

    /// Full reference, `$`/`${` and `}` included.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Operator after the `:` (`-`, `+`, ...); `Some("")` for `${name:}`.
    pub fn modifier(&self) -> Option<&str> {
        self.modifier.as_deref()
    }

    pub fn modifier_range(&self) -> Option<Range> {
        self.modifier_range
    }

    /// Word following the modifier, up to the closing brace.
    pub fn substitution(&self) -> Option<&str> {
        self.substitution.as_deref()
    }

    pub fn substitution_range(&self) -> Option<Range> {
        self.substitution_range
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn is_defined(&self) -> bool {
        self.resolution.is_declared()
    }

    /// Declared value, if any.
    pub fn value(&self) -> Option<&str> {
        self.resolution.value()
    }

    pub fn source(&self) -> Option<VariableSource> {
        self.source
    }

    pub fn is_build_variable(&self) -> bool {
        self.source == Some(VariableSource::Build)
    }

    pub fn is_environment_variable(&self) -> bool {
        self.source == Some(VariableSource::Environment)
    }

    /// Text this reference expands to, `None` when it stays verbatim.
    pub(crate) fn expansion(&self) -> Option<String> {
        let value = self.resolution.value();
        let substitution = || self.substitution.clone().unwrap_or_default();
        match self.modifier.as_deref() {
            Some("-") => Some(match value {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => substitution(),
            }),
            Some("+") => Some(match value {
                Some(v) if !v.is_empty() => substitution(),
                _ => String::new(),
            }),
            _ => value.map(str::to_string),
        }
    }
}
