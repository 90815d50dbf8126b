//! Configuration management
//!
//! Layered configuration: defaults, then an optional TOML file, then
//! `NSC_`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, LoggingConfig, NamespaceConfig, RegistryConfig};
