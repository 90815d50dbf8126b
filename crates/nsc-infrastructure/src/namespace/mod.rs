//! Namespace routing
//!
//! | Type | Description |
//! |------|-------------|
//! | [`NamespaceDirectory`] | namespace key to registry, created once per key |
//! | [`NamespaceScopedProxy`] | registry that routes to the current namespace |
//! | [`FramePropertyKeySource`] | current key from an execution frame property |
//! | [`FixedKeySource`] | constant key |

pub mod directory;
pub mod key_source;
pub mod proxy;

pub use directory::{DefaultRegistryFactory, NamespaceDirectory, NamespaceInfo};
pub use key_source::{FixedKeySource, FramePropertyKeySource};
pub use proxy::NamespaceScopedProxy;
