//! # Namespaced Components
//!
//! A component registry scoped by namespace, coupled to a per-thread stack of
//! execution frames. A multi-tenant host resolves pluggable services for the
//! namespace of the current request and carries request-scoped properties
//! across nested invocations.
//!
//! ## Example
//!
//! ```no_run
//! use nsc::infrastructure::{AppConfig, init_runtime};
//! use nsc::{ComponentRegistryExt, ExecutionFrame};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct Hello;
//! impl Greeter for Hello {
//!     fn greet(&self) -> String {
//!         "hello".into()
//!     }
//! }
//!
//! # fn main() -> nsc::Result<()> {
//! let runtime = init_runtime(AppConfig::default())?;
//! runtime
//!     .root()
//!     .register_instance::<dyn Greeter>(None, Arc::new(Hello))?;
//!
//! let frame = ExecutionFrame::new();
//! frame.declare("namespace").initial("wiki:acme").inherited().make_final().commit()?;
//! let _scope = runtime.lifecycle().enter(&frame)?;
//!
//! // Routed to the "wiki:acme" registry, falling back to the root registry
//! let greeter = runtime.registry().get::<dyn Greeter>()?;
//! assert_eq!(greeter.greet(), "hello");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - roles, descriptors, ports, the execution model and errors
//! - `infrastructure` - registries, namespace routing, thread execution,
//!   configuration, logging and the runtime composition root

/// Domain layer - core types and contracts
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use nsc_domain::*;
}

/// Infrastructure layer - registries, routing, config and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use nsc_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the runtime entry points
pub use infrastructure::{RuntimeContext, init_runtime, init_runtime_with};
