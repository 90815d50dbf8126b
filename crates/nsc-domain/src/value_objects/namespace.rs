//! Namespace keys
//!
//! A namespace key has the form `type:value` (`wiki:acme`, `user:acme:Admin`).
//! The type selects which registry factory builds the namespace registry.
//! Inside the type part, `\` escapes the separator and itself; the value part
//! is kept verbatim.

use crate::constants::{DEFAULT_NAMESPACE_SEPARATOR, NAMESPACE_ESCAPE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed namespace key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    namespace_type: Option<String>,
    value: String,
}

impl Namespace {
    /// Create a namespace from its parts
    pub fn new(namespace_type: Option<&str>, value: impl Into<String>) -> Self {
        Self {
            namespace_type: namespace_type.map(str::to_string),
            value: value.into(),
        }
    }

    /// Parse a key using the default `:` separator
    pub fn parse(key: &str) -> Self {
        Self::parse_with(key, DEFAULT_NAMESPACE_SEPARATOR)
    }

    /// Parse a key using a custom separator
    ///
    /// Without an unescaped separator the whole (unescaped) key becomes the
    /// value and the type is absent.
    pub fn parse_with(key: &str, separator: char) -> Self {
        let mut namespace_type = String::new();
        let mut escaped = false;

        for (index, c) in key.char_indices() {
            if escaped {
                namespace_type.push(c);
                escaped = false;
            } else if c == NAMESPACE_ESCAPE {
                escaped = true;
            } else if c == separator {
                return Self {
                    namespace_type: Some(namespace_type),
                    value: key[index + c.len_utf8()..].to_string(),
                };
            } else {
                namespace_type.push(c);
            }
        }

        // A dangling escape is kept as a literal backslash
        if escaped {
            namespace_type.push(NAMESPACE_ESCAPE);
        }

        Self {
            namespace_type: None,
            value: namespace_type,
        }
    }

    /// The type part, used as the registry factory hint
    pub fn namespace_type(&self) -> Option<&str> {
        self.namespace_type.as_deref()
    }

    /// The value part
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Serialize back to a key using the given separator
    pub fn to_key(&self, separator: char) -> String {
        match &self.namespace_type {
            Some(namespace_type) => format!(
                "{}{}{}",
                escape(namespace_type, separator),
                separator,
                self.value
            ),
            None => escape(&self.value, separator),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key(DEFAULT_NAMESPACE_SEPARATOR))
    }
}

/// Escape the separator and the escape character itself
pub fn escape(text: &str, separator: char) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == separator || c == NAMESPACE_ESCAPE {
            escaped.push(NAMESPACE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
