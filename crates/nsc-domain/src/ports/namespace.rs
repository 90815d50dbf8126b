//! Namespace Ports
//!
//! Contracts used to create per-namespace registries and to find out which
//! namespace the current unit of work belongs to.

use crate::error::Result;
use crate::ports::registry::ComponentRegistry;
use std::sync::Arc;

/// Builds the registry for a namespace
///
/// Factories are registered in the root registry under the namespace type as
/// hint (`wiki`, `user`, ...).
pub trait RegistryFactory: Send + Sync {
    /// Create the registry for `namespace_key`, delegating to `parent`
    fn create(
        &self,
        namespace_key: &str,
        parent: Arc<dyn ComponentRegistry>,
    ) -> Result<Arc<dyn ComponentRegistry>>;
}

/// Supplies the namespace key of the current unit of work
///
/// Must be a pure query without side effects.
pub trait NamespaceKeySource: Send + Sync {
    /// Current key, or `None` for the root namespace
    fn current_key(&self) -> Option<String>;
}
