//! Main application configuration

use serde::{Deserialize, Serialize};

pub use super::logging::LoggingConfig;
pub use super::namespace::NamespaceConfig;
pub use super::registry::RegistryConfig;

/// Root configuration of the runtime
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Namespace routing configuration
    pub namespace: NamespaceConfig,

    /// Component registry configuration
    pub registry: RegistryConfig,
}
