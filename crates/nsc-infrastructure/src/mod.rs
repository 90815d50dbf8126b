//! # Infrastructure Layer
//!
//! Concrete registries, namespace routing, the per-thread execution stack and
//! the ambient services (configuration, logging) that wire them together.
//!
//! ## Module Categories
//!
//! ### Components & Namespaces
//! | Module | Description |
//! |--------|-------------|
//! | [`registry`] | DashMap-backed component registry and event sinks |
//! | [`namespace`] | Namespace directory, scoped proxy and key sources |
//! | [`execution`] | Thread-local execution stack and lifecycle manager |
//! | [`bootstrap`] | Runtime composition root |
//!
//! ### Configuration & Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Layered TOML/env configuration with figment |
//! | [`constants`] | Centralized configuration constants |
//! | [`logging`] | Structured logging with tracing |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod execution;
pub mod logging;
pub mod namespace;
pub mod registry;

pub use bootstrap::{RuntimeContext, init_runtime, init_runtime_with};
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
pub use execution::{DefaultExecutionLifecycleManager, ExecutionScope, ThreadExecution};
pub use namespace::{
    DefaultRegistryFactory, FixedKeySource, FramePropertyKeySource, NamespaceDirectory,
    NamespaceScopedProxy,
};
pub use registry::{DefaultComponentRegistry, TracingEventSink};
