//! Domain Port Interfaces
//!
//! Boundary contracts implemented by the infrastructure layer and by hosts.
//!
//! ## Organization
//!
//! - **registry** - component registry, factories, dependency sets
//! - **events** - register/unregister notification sink
//! - **namespace** - per-namespace registry factories and key sources
//! - **execution** - execution stack access, initializers, lifecycle manager

/// Execution context ports
pub mod execution;
/// Registry event sink port
pub mod events;
/// Namespace ports
pub mod namespace;
/// Component registry port
pub mod registry;

pub use events::RegistryEventSink;
pub use execution::{Execution, ExecutionInitializer, ExecutionLifecycleManager};
pub use namespace::{NamespaceKeySource, RegistryFactory};
pub use registry::{
    ComponentFactory, ComponentRegistry, ComponentRegistryExt, Dependencies, Disposable,
    ResolutionPath,
};
