//! Default component registry
//!
//! Thread-safe registry backed by a [`DashMap`] of entries. Each entry pairs
//! an immutable descriptor with a once-cell holding the cached singleton.
//!
//! ## Construction
//!
//! ```text
//! resolve(rh, path)
//!   ├─ no local entry ──▶ parent.resolve(rh, path) or NotFound
//!   ├─ path.enter(rh)   (LookupCycle on re-entry)
//!   ├─ cached singleton ──▶ return
//!   ├─ resolve every dependency (this registry, then parents)
//!   └─ factory.create(deps) inside the entry's once-cell
//! ```
//!
//! Dependencies are resolved before the once-cell is entered, so no lock is
//! held while the registry is re-entered. Two threads racing on a cold
//! singleton may both resolve its dependencies, but only one runs the
//! factory; the other waits for and returns the same instance.

use dashmap::DashMap;
use nsc_domain::entities::Component;
use nsc_domain::error::{Error, Result};
use nsc_domain::ports::{ComponentRegistry, Dependencies, RegistryEventSink, ResolutionPath};
use nsc_domain::value_objects::{Descriptor, InstantiationStrategy, Role, RoleHint};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, trace, warn};

struct RegistryEntry {
    descriptor: Arc<Descriptor>,
    instance: OnceCell<Component>,
    sequence: u64,
}

impl RegistryEntry {
    fn new(descriptor: Arc<Descriptor>, sequence: u64) -> Self {
        Self {
            descriptor,
            instance: OnceCell::new(),
            sequence,
        }
    }

    fn with_instance(descriptor: Arc<Descriptor>, sequence: u64, instance: Component) -> Self {
        Self {
            descriptor,
            instance: OnceCell::with_value(instance),
            sequence,
        }
    }
}

/// Thread-safe component registry with optional parent fallback
pub struct DefaultComponentRegistry {
    entries: DashMap<RoleHint, Arc<RegistryEntry>>,
    sequence: AtomicU64,
    parent: RwLock<Option<Arc<dyn ComponentRegistry>>>,
    event_sink: RwLock<Option<Arc<dyn RegistryEventSink>>>,
}

impl DefaultComponentRegistry {
    /// Empty registry without parent or event sink
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            sequence: AtomicU64::new(0),
            parent: RwLock::new(None),
            event_sink: RwLock::new(None),
        }
    }

    /// Set the parent used for fallback lookups
    pub fn with_parent(mut self, parent: Arc<dyn ComponentRegistry>) -> Self {
        self.parent = RwLock::new(Some(parent));
        self
    }

    /// Set the sink notified on register/unregister
    pub fn with_event_sink(mut self, sink: Option<Arc<dyn RegistryEventSink>>) -> Self {
        self.event_sink = RwLock::new(sink);
        self
    }

    /// Number of local registrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered locally
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn event_sink(&self) -> Option<Arc<dyn RegistryEventSink>> {
        self.event_sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn entry(&self, role_hint: &RoleHint) -> Option<Arc<RegistryEntry>> {
        self.entries.get(role_hint).map(|e| Arc::clone(e.value()))
    }

    /// Local entries of `role`, in registration order
    fn entries_for(&self, role: Role) -> Vec<Arc<RegistryEntry>> {
        let mut entries: Vec<Arc<RegistryEntry>> = self
            .entries
            .iter()
            .filter(|e| e.key().role() == role)
            .map(|e| Arc::clone(e.value()))
            .collect();
        entries.sort_by_key(|e| e.sequence);
        entries
    }

    fn sorted_entries(&self) -> Vec<Arc<RegistryEntry>> {
        let mut entries: Vec<Arc<RegistryEntry>> =
            self.entries.iter().map(|e| Arc::clone(e.value())).collect();
        entries.sort_by_key(|e| e.sequence);
        entries
    }

    fn instantiate(&self, entry: &RegistryEntry, path: &mut ResolutionPath) -> Result<Component> {
        let role_hint = entry.descriptor.role_hint();
        path.enter(role_hint)?;
        let result = self.build_or_get(entry, path);
        path.leave();
        result
    }

    fn build_or_get(&self, entry: &RegistryEntry, path: &mut ResolutionPath) -> Result<Component> {
        let descriptor = &entry.descriptor;
        match descriptor.strategy() {
            InstantiationStrategy::Singleton => {
                if let Some(component) = entry.instance.get() {
                    trace!(role_hint = %descriptor.role_hint(), "Returning cached singleton");
                    return Ok(component.clone());
                }
                let dependencies = self.resolve_dependencies(descriptor, path)?;
                entry
                    .instance
                    .get_or_try_init(|| construct(descriptor, &dependencies))
                    .cloned()
            }
            InstantiationStrategy::PerLookup => {
                let dependencies = self.resolve_dependencies(descriptor, path)?;
                construct(descriptor, &dependencies)
            }
        }
    }

    fn resolve_dependencies(
        &self,
        descriptor: &Descriptor,
        path: &mut ResolutionPath,
    ) -> Result<Dependencies> {
        let mut dependencies = Dependencies::new();
        for dependency in descriptor.dependencies() {
            let component = self.resolve(dependency, path)?;
            dependencies.insert(dependency.clone(), component);
        }
        Ok(dependencies)
    }
}

fn construct(descriptor: &Descriptor, dependencies: &Dependencies) -> Result<Component> {
    let role_hint = descriptor.role_hint();
    let factory = descriptor.factory().ok_or_else(|| {
        Error::instantiation(
            role_hint.to_string(),
            "no factory registered and no cached instance available",
        )
    })?;

    let component = factory.create(dependencies).map_err(|e| match e {
        Error::NotFound { .. }
        | Error::LookupCycle { .. }
        | Error::Instantiation { .. }
        | Error::MisconfiguredProxy { .. } => e,
        other => Error::instantiation_with_source(role_hint.to_string(), "factory failed", other),
    })?;

    if component.role() != role_hint.role() {
        return Err(Error::instantiation(
            role_hint.to_string(),
            format!("factory produced an instance of {}", component.role()),
        ));
    }

    debug!(
        role_hint = %role_hint,
        implementation = descriptor.implementation().unwrap_or("-"),
        "Component instantiated"
    );
    Ok(component)
}

impl Default for DefaultComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry for DefaultComponentRegistry {
    fn register(&self, descriptor: Descriptor, instance: Option<Component>) -> Result<()> {
        let role_hint = descriptor.role_hint().clone();
        let descriptor = Arc::new(descriptor);
        let sequence = self.next_sequence();

        let entry = match instance {
            Some(instance) => {
                if instance.role() != role_hint.role() {
                    warn!(role_hint = %role_hint, "Rejected instance built for another role");
                    return Err(Error::instantiation(
                        role_hint.to_string(),
                        format!("supplied instance was built for {}", instance.role()),
                    ));
                }
                if descriptor.strategy() == InstantiationStrategy::PerLookup {
                    warn!(role_hint = %role_hint, "Rejected ready instance for per-lookup component");
                    return Err(Error::instantiation(
                        role_hint.to_string(),
                        "a ready instance can only be registered as a singleton",
                    ));
                }
                RegistryEntry::with_instance(Arc::clone(&descriptor), sequence, instance)
            }
            None => RegistryEntry::new(Arc::clone(&descriptor), sequence),
        };
        let entry = Arc::new(entry);

        if let Some(previous) = self.entries.insert(role_hint.clone(), Arc::clone(&entry)) {
            if let Some(old) = previous.instance.get() {
                let kept = entry
                    .instance
                    .get()
                    .is_some_and(|new| Component::ptr_eq(new, old));
                if !kept {
                    old.release();
                }
            }
            debug!(role_hint = %role_hint, "Component registration replaced");
        }

        debug!(
            role_hint = %role_hint,
            strategy = ?descriptor.strategy(),
            dependencies = descriptor.dependencies().len(),
            "Component registered"
        );
        if let Some(sink) = self.event_sink() {
            sink.on_register(&descriptor);
        }
        Ok(())
    }

    fn unregister(&self, role_hint: &RoleHint) -> Result<()> {
        let Some((_, entry)) = self.entries.remove(role_hint) else {
            return Ok(());
        };
        if let Some(instance) = entry.instance.get() {
            instance.release();
        }
        debug!(role_hint = %role_hint, "Component unregistered");
        if let Some(sink) = self.event_sink() {
            sink.on_unregister(role_hint);
        }
        Ok(())
    }

    fn resolve(&self, role_hint: &RoleHint, path: &mut ResolutionPath) -> Result<Component> {
        match self.entry(role_hint) {
            Some(entry) => self.instantiate(&entry, path),
            None => match self.parent() {
                Some(parent) => parent.resolve(role_hint, path),
                None => Err(Error::not_found(role_hint.to_string())),
            },
        }
    }

    fn lookup_all(&self, role: Role) -> Result<Vec<Component>> {
        self.entries_for(role)
            .iter()
            .map(|entry| self.instantiate(entry, &mut ResolutionPath::new()))
            .collect()
    }

    fn lookup_map(&self, role: Role) -> Result<HashMap<String, Component>> {
        self.entries_for(role)
            .iter()
            .map(|entry| {
                let hint = entry.descriptor.role_hint().hint().to_string();
                self.instantiate(entry, &mut ResolutionPath::new())
                    .map(|component| (hint, component))
            })
            .collect()
    }

    fn release(&self, component: &Component) -> Result<()> {
        let owner = self
            .entries
            .iter()
            .find(|e| {
                e.value()
                    .instance
                    .get()
                    .is_some_and(|cached| Component::ptr_eq(cached, component))
            })
            .map(|e| (e.key().clone(), Arc::clone(e.value())));

        let Some((role_hint, entry)) = owner else {
            // Singletons resolved through the parent chain are cached there
            return match self.parent() {
                Some(parent) => parent.release(component),
                None => {
                    component.release();
                    Ok(())
                }
            };
        };

        if let Some(mut slot) = self.entries.get_mut(&role_hint) {
            if Arc::ptr_eq(slot.value(), &entry) {
                *slot.value_mut() = Arc::new(RegistryEntry::new(
                    Arc::clone(&entry.descriptor),
                    entry.sequence,
                ));
                debug!(role_hint = %role_hint, "Cached singleton released");
            }
        }

        component.release();
        Ok(())
    }

    fn has_component(&self, role_hint: &RoleHint) -> Result<bool> {
        if self.entries.contains_key(role_hint) {
            return Ok(true);
        }
        match self.parent() {
            Some(parent) => parent.has_component(role_hint),
            None => Ok(false),
        }
    }

    fn has_local_component(&self, role_hint: &RoleHint) -> Result<bool> {
        Ok(self.entries.contains_key(role_hint))
    }

    fn descriptor(&self, role_hint: &RoleHint) -> Result<Option<Arc<Descriptor>>> {
        if let Some(entry) = self.entry(role_hint) {
            return Ok(Some(Arc::clone(&entry.descriptor)));
        }
        match self.parent() {
            Some(parent) => parent.descriptor(role_hint),
            None => Ok(None),
        }
    }

    fn descriptors(&self, role: Role) -> Result<Vec<Arc<Descriptor>>> {
        Ok(self
            .entries_for(role)
            .into_iter()
            .map(|entry| Arc::clone(&entry.descriptor))
            .collect())
    }

    fn role_hints(&self) -> Result<Vec<RoleHint>> {
        Ok(self
            .sorted_entries()
            .into_iter()
            .map(|entry| entry.descriptor.role_hint().clone())
            .collect())
    }

    fn parent(&self) -> Option<Arc<dyn ComponentRegistry>> {
        self.parent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_parent(&self, parent: Option<Arc<dyn ComponentRegistry>>) {
        *self.parent.write().unwrap_or_else(PoisonError::into_inner) = parent;
    }

    fn set_event_sink(&self, sink: Option<Arc<dyn RegistryEventSink>>) -> Result<()> {
        *self
            .event_sink
            .write()
            .unwrap_or_else(PoisonError::into_inner) = sink;
        Ok(())
    }

    /// Releases cached singletons in reverse registration order
    fn dispose(&self) -> Result<()> {
        let entries = self.sorted_entries();
        self.entries.clear();
        for entry in entries.iter().rev() {
            if let Some(instance) = entry.instance.get() {
                instance.release();
            }
        }
        debug!(released = entries.len(), "Component registry disposed");
        Ok(())
    }
}

impl fmt::Debug for DefaultComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultComponentRegistry")
            .field("components", &self.entries.len())
            .field("has_parent", &self.parent().is_some())
            .field("has_event_sink", &self.event_sink().is_some())
            .finish()
    }
}
