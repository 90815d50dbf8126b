//! Namespace routing configuration types

use crate::constants::DEFAULT_NAMESPACE_KEY_PROPERTY;
use nsc_domain::constants::DEFAULT_NAMESPACE_SEPARATOR;
use serde::{Deserialize, Serialize};

/// Namespace routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Separator between the namespace type and its value
    pub separator: char,

    /// Execution frame property holding the current namespace key
    pub key_property: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_NAMESPACE_SEPARATOR,
            key_property: DEFAULT_NAMESPACE_KEY_PROPERTY.to_string(),
        }
    }
}
