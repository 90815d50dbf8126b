//! Namespace-scoped registry proxy
//!
//! A [`ComponentRegistry`] that routes every call to the registry of the
//! current namespace, as reported by a [`NamespaceKeySource`].
//!
//! | Operation | Routing |
//! |-----------|---------|
//! | `register`, `set_event_sink` | namespace registry, created on demand |
//! | lookups and queries | namespace registry if it exists, else the internal parent |
//! | `unregister` | namespace registry if it exists, else nothing |
//!
//! The internal parent must be set with `set_parent` before first use; until
//! then every operation fails with `MisconfiguredProxy`.

use crate::namespace::directory::NamespaceDirectory;
use nsc_domain::entities::Component;
use nsc_domain::error::{Error, Result};
use nsc_domain::ports::{ComponentRegistry, NamespaceKeySource, RegistryEventSink, ResolutionPath};
use nsc_domain::value_objects::{Descriptor, Role, RoleHint};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{trace, warn};

/// Registry that delegates to the current namespace's registry
pub struct NamespaceScopedProxy {
    directory: Arc<NamespaceDirectory>,
    key_source: Arc<dyn NamespaceKeySource>,
    internal_parent: RwLock<Option<Arc<dyn ComponentRegistry>>>,
}

impl NamespaceScopedProxy {
    /// Proxy without internal parent; call `set_parent` before use
    pub fn new(directory: Arc<NamespaceDirectory>, key_source: Arc<dyn NamespaceKeySource>) -> Self {
        Self {
            directory,
            key_source,
            internal_parent: RwLock::new(None),
        }
    }

    /// The directory the proxy routes through
    pub fn directory(&self) -> &Arc<NamespaceDirectory> {
        &self.directory
    }

    /// Namespace key calls are currently routed to
    pub fn current_key(&self) -> Option<String> {
        self.key_source.current_key()
    }

    fn internal_parent(&self) -> Result<Arc<dyn ComponentRegistry>> {
        self.internal_parent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| {
                warn!("Namespace proxy used before its parent registry was set");
                Error::misconfigured_proxy("internal parent registry is not set")
            })
    }

    /// Registry for the current namespace, falling back to the internal parent
    fn target(&self, create: bool) -> Result<Arc<dyn ComponentRegistry>> {
        let parent = self.internal_parent()?;
        let key = self.key_source.current_key();
        trace!(namespace = ?key, create, "Routing registry call");
        Ok(self.directory.get(key.as_deref(), create)?.unwrap_or(parent))
    }
}

impl ComponentRegistry for NamespaceScopedProxy {
    fn register(&self, descriptor: Descriptor, instance: Option<Component>) -> Result<()> {
        self.target(true)?.register(descriptor, instance)
    }

    fn unregister(&self, role_hint: &RoleHint) -> Result<()> {
        self.internal_parent()?;
        let key = self.key_source.current_key();
        match self.directory.get(key.as_deref(), false)? {
            Some(registry) => registry.unregister(role_hint),
            None => Ok(()),
        }
    }

    fn resolve(&self, role_hint: &RoleHint, path: &mut ResolutionPath) -> Result<Component> {
        self.target(false)?.resolve(role_hint, path)
    }

    fn lookup_all(&self, role: Role) -> Result<Vec<Component>> {
        self.target(false)?.lookup_all(role)
    }

    fn lookup_map(&self, role: Role) -> Result<HashMap<String, Component>> {
        self.target(false)?.lookup_map(role)
    }

    fn release(&self, component: &Component) -> Result<()> {
        self.target(false)?.release(component)
    }

    fn has_component(&self, role_hint: &RoleHint) -> Result<bool> {
        self.target(false)?.has_component(role_hint)
    }

    fn has_local_component(&self, role_hint: &RoleHint) -> Result<bool> {
        self.target(false)?.has_local_component(role_hint)
    }

    fn descriptor(&self, role_hint: &RoleHint) -> Result<Option<Arc<Descriptor>>> {
        self.target(false)?.descriptor(role_hint)
    }

    fn descriptors(&self, role: Role) -> Result<Vec<Arc<Descriptor>>> {
        self.target(false)?.descriptors(role)
    }

    fn role_hints(&self) -> Result<Vec<RoleHint>> {
        self.target(false)?.role_hints()
    }

    fn parent(&self) -> Option<Arc<dyn ComponentRegistry>> {
        self.internal_parent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_parent(&self, parent: Option<Arc<dyn ComponentRegistry>>) {
        *self
            .internal_parent
            .write()
            .unwrap_or_else(PoisonError::into_inner) = parent;
    }

    fn set_event_sink(&self, sink: Option<Arc<dyn RegistryEventSink>>) -> Result<()> {
        self.target(true)?.set_event_sink(sink)
    }
}

impl fmt::Debug for NamespaceScopedProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceScopedProxy")
            .field("current_key", &self.key_source.current_key())
            .field("has_parent", &self.parent().is_some())
            .finish_non_exhaustive()
    }
}
