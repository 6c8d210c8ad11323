//! Logging infrastructure for dockerlex
//!
//! Structured logging through `tracing` when the `logging` feature is on.
//! Dockerfiles routinely carry credentials in ARG/ENV values, so document
//! text is summarized rather than logged and property values are redacted.
//!
//! # Log Levels
//!
//! - **DEBUG**: parse start/finish, directives, stage boundaries
//! - **TRACE**: heredoc consumption, declared properties

#![cfg_attr(not(feature = "logging"), allow(dead_code))]

use std::borrow::Cow;
use std::collections::HashSet;

/// Emit a debug event when the `logging` feature is enabled.
macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "logging")]
        {
            tracing::debug!($($arg)*);
        }
    };
}

/// Emit a trace event when the `logging` feature is enabled.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "logging")]
        {
            tracing::trace!($($arg)*);
        }
    };
}

pub(crate) use debug_event;
pub(crate) use trace_event;

/// Configuration for logging behavior
///
/// By default property values whose names look sensitive are redacted and
/// document content is never logged.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether to redact sensitive values from logs (default: true)
    pub redact_sensitive: bool,

    /// ARG/ENV name patterns whose values are redacted (case-insensitive)
    pub redact_names: HashSet<String>,

    /// Whether to include document text in logs (default: false)
    pub log_document_content: bool,

    /// Maximum length of logged values before truncation (default: 200)
    pub max_value_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        let mut redact_names = HashSet::new();
        for pattern in &[
            "PASSWORD",
            "PASSWD",
            "SECRET",
            "TOKEN",
            "KEY",
            "CREDENTIAL",
            "AUTH",
            "API_KEY",
            "APIKEY",
            "PRIVATE",
            "BEARER",
            "JWT",
            "SESSION",
            "COOKIE",
            "DATABASE_URL",
            "DB_URL",
            "CONNECTION_STRING",
            "AWS_SECRET",
            "AWS_ACCESS",
            "GITHUB_TOKEN",
            "NPM_TOKEN",
            "NPM_AUTH",
            "PIP_INDEX_URL",
            "REGISTRY_PASSWORD",
        ] {
            redact_names.insert(pattern.to_string());
        }
        Self {
            redact_sensitive: true,
            redact_names,
            log_document_content: false,
            max_value_length: 200,
        }
    }
}

impl LogConfig {
    /// Create a new log configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable sensitive data redaction (use only for debugging)
    pub fn unsafe_disable_redaction(mut self) -> Self {
        self.redact_sensitive = false;
        self
    }

    /// Add a custom name pattern to redact
    pub fn redact_name(mut self, pattern: &str) -> Self {
        self.redact_names.insert(pattern.to_uppercase());
        self
    }

    /// Enable logging of document content
    ///
    /// Dockerfiles may embed credentials in ARG defaults and ENV values.
    pub fn unsafe_log_documents(mut self) -> Self {
        self.log_document_content = true;
        self
    }

    /// Set maximum length for logged values
    pub fn max_value_length(mut self, len: usize) -> Self {
        self.max_value_length = len;
        self
    }

    /// Check if a property name should have its value redacted
    pub fn should_redact_name(&self, name: &str) -> bool {
        if !self.redact_sensitive {
            return false;
        }
        let upper = name.to_uppercase();
        self.redact_names.iter().any(|pattern| upper.contains(pattern))
    }

    /// Render a declared property value for logging.
    pub fn property_value<'a>(&self, name: &str, value: Option<&'a str>) -> Cow<'a, str> {
        match value {
            None => Cow::Borrowed("<unset>"),
            Some(_) if self.should_redact_name(name) => Cow::Borrowed("[REDACTED]"),
            Some(value) => self.redact_value(value),
        }
    }

    /// Redact a value if it appears sensitive
    pub fn redact_value<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if !self.redact_sensitive {
            return self.truncate(value);
        }

        let lower = value.to_lowercase();
        if lower.contains("password")
            || lower.contains("secret")
            || lower.contains("token")
            || lower.contains("bearer ")
            || is_likely_secret(value)
        {
            return Cow::Borrowed("[REDACTED]");
        }

        self.truncate(value)
    }

    /// Truncate value if it exceeds max length
    ///
    /// Handles UTF-8 char boundaries properly to avoid panics on multi-byte chars.
    fn truncate<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if value.len() <= self.max_value_length {
            Cow::Borrowed(value)
        } else {
            let mut end = self.max_value_length;
            while end > 0 && !value.is_char_boundary(end) {
                end -= 1;
            }
            Cow::Owned(format!(
                "{}...[truncated {} bytes]",
                &value[..end],
                value.len() - end
            ))
        }
    }
}

/// Check if a value looks like a secret (API key prefixes, JWTs, high entropy)
fn is_likely_secret(value: &str) -> bool {
    let trimmed = value.trim();

    if trimmed.matches('.').count() == 2 {
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.iter().all(|p| p.len() > 10 && is_base64_like(p)) {
            return true;
        }
    }

    let prefixes = [
        "sk-", "pk-", "sk_live_", "sk_test_", "ghp_", "gho_", "ghu_", "ghs_", "ghr_", "glpat-",
        "xoxb-", "xoxp-", "AKIA", "eyJ",
    ];
    for prefix in prefixes {
        if trimmed.starts_with(prefix) && trimmed.len() > prefix.len() + 10 {
            return true;
        }
    }

    trimmed.len() >= 32 && is_high_entropy(trimmed)
}

fn is_base64_like(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=' || c == '_' || c == '-'
    })
}

/// High ratio of unique chars suggests random data
fn is_high_entropy(s: &str) -> bool {
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return false;
    }

    let unique: HashSet<char> = s.chars().collect();
    let ratio = unique.len() as f64 / s.len() as f64;
    ratio > 0.5 && unique.len() > 15
}

/// Escape characters that could forge log lines.
pub fn sanitize_for_log(input: &str) -> String {
    input
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
        .chars()
        .filter(|c| !c.is_control() || *c == ' ')
        .collect()
}

/// Format a document for logging: a size summary unless content logging is on.
pub fn format_document_for_log(text: &str, config: &LogConfig) -> String {
    if !config.log_document_content {
        let lines = text.lines().count();
        let bytes = text.len();
        return format!("[dockerfile: {} lines, {} bytes]", lines, bytes);
    }

    let sanitized = sanitize_for_log(text);
    config.truncate(&sanitized).into_owned()
}
