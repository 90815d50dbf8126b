//! Domain Value Objects
//!
//! Immutable values that identify and describe registrable components.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`Role`] | Service contract identifier (type id + name) |
//! | [`RoleHint`] | Registration slot: role plus hint |
//! | [`Descriptor`] | Registration record with strategy, dependencies and factory |
//! | [`Namespace`] | Parsed `type:value` namespace key |

/// Component descriptors and instantiation strategies
pub mod descriptor;
/// Namespace key parsing
pub mod namespace;
/// Roles and role hints
pub mod role;

pub use descriptor::{Descriptor, DescriptorBuilder, InstantiationStrategy};
pub use namespace::Namespace;
pub use role::{Role, RoleHint};
