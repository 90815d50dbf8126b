//! Registry Event Sink Port
//!
//! Fire-and-forget notifications emitted by registries. Sinks must not block
//! and cannot fail back into the registry: both callbacks return nothing.

use crate::value_objects::{Descriptor, RoleHint};

/// Receiver of register/unregister notifications
pub trait RegistryEventSink: Send + Sync {
    /// A descriptor was added or replaced
    fn on_register(&self, descriptor: &Descriptor);

    /// A slot was removed
    fn on_unregister(&self, role_hint: &RoleHint);
}
