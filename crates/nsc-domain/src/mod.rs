//! # Domain Layer
//!
//! Core types and contracts for the namespaced component runtime.
//!
//! ## Module Categories
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`value_objects`] | Roles, role hints, descriptors and namespace keys |
//! | [`entities`] | Constructed component handles |
//! | [`ports`] | Registry, namespace and execution contracts |
//! | [`execution`] | Execution frames, properties and the frame stack |
//! | [`error`] | Error taxonomy shared by every layer |
//!
//! The domain layer holds no global state. Registries, namespace directories
//! and the per-thread execution slot live in the infrastructure crate.

pub mod constants;
pub mod entities;
pub mod error;
pub mod execution;
pub mod ports;
pub mod value_objects;

pub use entities::Component;
pub use error::{Error, Result};
pub use execution::{ExecutionFrame, ExecutionStack, Property, PropertyValue, ValueType};
pub use ports::{
    ComponentFactory, ComponentRegistry, ComponentRegistryExt, Dependencies, Disposable,
    Execution, ExecutionInitializer, ExecutionLifecycleManager, NamespaceKeySource,
    RegistryEventSink, RegistryFactory, ResolutionPath,
};
pub use value_objects::{Descriptor, InstantiationStrategy, Namespace, Role, RoleHint};
