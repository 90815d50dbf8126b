//! Registry configuration types

use serde::{Deserialize, Serialize};

/// Component registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Emit a tracing event for every register/unregister
    pub trace_events: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { trace_events: true }
    }
}
