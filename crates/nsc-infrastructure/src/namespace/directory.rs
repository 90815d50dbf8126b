//! Namespace directory
//!
//! Maps namespace keys to their registries and creates each registry at most
//! once, on first use.
//!
//! ## Creation
//!
//! ```text
//! get("wiki:acme", create = true)
//!   ├─ parse type "wiki"
//!   ├─ root has dyn RegistryFactory["wiki"]? ──▶ use it
//!   │                                  else ──▶ default factory
//!   └─ factory.create("wiki:acme", root)
//! ```
//!
//! Every key owns a once-cell inserted under a short map lock; the factory
//! runs inside that cell, outside the map lock. Concurrent callers for the
//! same key wait for the one creation, other keys are unaffected. A failed
//! creation removes its empty cell and the next call retries.
//!
//! A factory must not call back into the directory for the key it is
//! creating.

use crate::registry::DefaultComponentRegistry;
use dashmap::DashMap;
use nsc_domain::constants::DEFAULT_NAMESPACE_SEPARATOR;
use nsc_domain::error::Result;
use nsc_domain::ports::{ComponentRegistry, ComponentRegistryExt, RegistryEventSink, RegistryFactory};
use nsc_domain::value_objects::{Namespace, RoleHint};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type RegistryCell = Arc<OnceCell<Arc<dyn ComponentRegistry>>>;

/// Factory used when no namespace-type specific factory is registered
///
/// Builds a [`DefaultComponentRegistry`] delegating to the given parent.
#[derive(Default, Clone)]
pub struct DefaultRegistryFactory {
    event_sink: Option<Arc<dyn RegistryEventSink>>,
}

impl DefaultRegistryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink installed in every registry this factory builds
    pub fn with_event_sink(mut self, sink: Option<Arc<dyn RegistryEventSink>>) -> Self {
        self.event_sink = sink;
        self
    }
}

impl RegistryFactory for DefaultRegistryFactory {
    fn create(
        &self,
        namespace_key: &str,
        parent: Arc<dyn ComponentRegistry>,
    ) -> Result<Arc<dyn ComponentRegistry>> {
        debug!(namespace = namespace_key, "Building default namespace registry");
        Ok(Arc::new(
            DefaultComponentRegistry::new()
                .with_parent(parent)
                .with_event_sink(self.event_sink.clone()),
        ))
    }
}

/// Serializable view of one namespace registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceInfo {
    /// Namespace key
    pub key: String,
    /// Parsed namespace type, if any
    pub namespace_type: Option<String>,
    /// Locally registered components, in registration order
    pub components: Vec<String>,
}

/// Namespace key to registry map with get-or-create semantics
pub struct NamespaceDirectory {
    root: Arc<dyn ComponentRegistry>,
    registries: DashMap<String, RegistryCell>,
    default_factory: Arc<dyn RegistryFactory>,
    separator: char,
}

impl NamespaceDirectory {
    /// Directory over `root`, using [`DefaultRegistryFactory`] as fallback
    pub fn new(root: Arc<dyn ComponentRegistry>) -> Self {
        Self {
            root,
            registries: DashMap::new(),
            default_factory: Arc::new(DefaultRegistryFactory::new()),
            separator: DEFAULT_NAMESPACE_SEPARATOR,
        }
    }

    /// Replace the fallback factory
    pub fn with_default_factory(mut self, factory: Arc<dyn RegistryFactory>) -> Self {
        self.default_factory = factory;
        self
    }

    /// Use a custom separator when parsing namespace types
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// The root registry
    pub fn root(&self) -> Arc<dyn ComponentRegistry> {
        Arc::clone(&self.root)
    }

    /// Registry for `key`
    ///
    /// `None` maps to the root registry. An unknown key yields `None` unless
    /// `create` is set, in which case the registry is built.
    pub fn get(
        &self,
        key: Option<&str>,
        create: bool,
    ) -> Result<Option<Arc<dyn ComponentRegistry>>> {
        let Some(key) = key else {
            return Ok(Some(self.root()));
        };

        if !create {
            return Ok(self
                .registries
                .get(key)
                .and_then(|cell| cell.value().get().cloned()));
        }

        let cell = Arc::clone(
            self.registries
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        );
        match cell.get_or_try_init(|| self.create_registry(key)) {
            Ok(registry) => Ok(Some(Arc::clone(registry))),
            Err(e) => {
                // Drop the empty slot so failing keys do not accumulate
                self.registries.remove_if(key, |_, slot| {
                    Arc::ptr_eq(slot, &cell) && slot.get().is_none()
                });
                Err(e)
            }
        }
    }

    fn create_registry(&self, key: &str) -> Result<Arc<dyn ComponentRegistry>> {
        let namespace = Namespace::parse_with(key, self.separator);
        let factory = self.factory_for(namespace.namespace_type())?;
        let registry = factory.create(key, self.root())?;
        debug!(
            namespace = key,
            namespace_type = namespace.namespace_type().unwrap_or("-"),
            "Namespace registry created"
        );
        Ok(registry)
    }

    fn factory_for(&self, namespace_type: Option<&str>) -> Result<Arc<dyn RegistryFactory>> {
        if let Some(namespace_type) = namespace_type {
            let role_hint = RoleHint::named::<dyn RegistryFactory>(namespace_type);
            if self.root.has_component(&role_hint)? {
                return self.root.get_named::<dyn RegistryFactory>(namespace_type);
            }
        }
        Ok(Arc::clone(&self.default_factory))
    }

    /// Whether a registry exists for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.registries
            .get(key)
            .is_some_and(|cell| cell.value().get().is_some())
    }

    /// Keys of every created registry, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .registries
            .iter()
            .filter(|cell| cell.value().get().is_some())
            .map(|cell| cell.key().clone())
            .collect();
        keys.sort();
        keys
    }

    /// Number of created registries
    pub fn len(&self) -> usize {
        self.registries
            .iter()
            .filter(|cell| cell.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove the registry for `key` and dispose it
    ///
    /// Returns whether a registry was removed.
    pub fn dispose(&self, key: &str) -> Result<bool> {
        let Some((_, cell)) = self.registries.remove(key) else {
            return Ok(false);
        };
        match cell.get() {
            Some(registry) => {
                registry.dispose()?;
                debug!(namespace = key, "Namespace registry disposed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Serializable view of every created registry, sorted by key
    pub fn snapshot(&self) -> Result<Vec<NamespaceInfo>> {
        let registries: Vec<(String, Arc<dyn ComponentRegistry>)> = self
            .registries
            .iter()
            .filter_map(|cell| {
                cell.value()
                    .get()
                    .map(|registry| (cell.key().clone(), Arc::clone(registry)))
            })
            .collect();

        let mut infos = registries
            .into_iter()
            .map(|(key, registry)| {
                let components = registry
                    .role_hints()?
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                let namespace = Namespace::parse_with(&key, self.separator);
                Ok(NamespaceInfo {
                    namespace_type: namespace.namespace_type().map(str::to_string),
                    key,
                    components,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        infos.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(infos)
    }
}

impl fmt::Debug for NamespaceDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceDirectory")
            .field("namespaces", &self.keys())
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}
