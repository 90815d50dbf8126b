//! Component Registry Port
//!
//! Defines the contract every registry implementation honours, whether it is
//! a plain registry or a proxy that routes to a per-namespace registry.
//!
//! ## Methods
//!
//! | Method | Purpose |
//! |--------|---------|
//! | `register` | Add or replace the descriptor for a slot |
//! | `unregister` | Remove a slot and release its cached singleton |
//! | `lookup` | Resolve one instance (parent chain included) |
//! | `lookup_all` / `lookup_map` | Resolve every local hint of a role |
//! | `release` | Run a component's shutdown hook and drop it from the cache |
//! | `resolve` | `lookup` with an explicit call-path for cycle detection |
//!
//! ## Usage
//!
//! ```no_run
//! use nsc_domain::ports::{ComponentRegistry, ComponentRegistryExt};
//! use std::sync::Arc;
//!
//! trait Cache: Send + Sync {}
//!
//! fn cache(registry: &dyn ComponentRegistry) -> nsc_domain::Result<Arc<dyn Cache>> {
//!     registry.get::<dyn Cache>()
//! }
//! ```

use crate::constants::DEFAULT_HINT;
use crate::entities::Component;
use crate::error::{Error, Result};
use crate::ports::events::RegistryEventSink;
use crate::value_objects::{Descriptor, Role, RoleHint};
use std::collections::HashMap;
use std::sync::Arc;

/// Shutdown hook exposed by components that hold resources
pub trait Disposable: Send + Sync {
    /// Release resources; called at most once per component
    fn dispose(&self);
}

/// Builds component instances from their resolved dependencies
pub trait ComponentFactory: Send + Sync {
    /// Construct a new instance
    fn create(&self, dependencies: &Dependencies) -> Result<Component>;
}

impl<F> ComponentFactory for F
where
    F: Fn(&Dependencies) -> Result<Component> + Send + Sync,
{
    fn create(&self, dependencies: &Dependencies) -> Result<Component> {
        self(dependencies)
    }
}

/// Dependencies resolved for one construction, keyed by slot
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    resolved: HashMap<RoleHint, Component>,
}

impl Dependencies {
    /// Empty dependency set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved dependency
    pub fn insert(&mut self, role_hint: RoleHint, component: Component) {
        self.resolved.insert(role_hint, component);
    }

    /// Raw handle for a slot
    pub fn component(&self, role_hint: &RoleHint) -> Option<&Component> {
        self.resolved.get(role_hint)
    }

    /// Typed access to the default implementation of role `R`
    pub fn get<R: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<R>> {
        self.get_named::<R>(DEFAULT_HINT)
    }

    /// Typed access to a named implementation of role `R`
    pub fn get_named<R: ?Sized + Send + Sync + 'static>(&self, hint: &str) -> Result<Arc<R>> {
        let role_hint = RoleHint::named::<R>(hint);
        let component = self
            .resolved
            .get(&role_hint)
            .ok_or_else(|| Error::not_found(role_hint.to_string()))?;
        downcast::<R>(component)
    }

    /// Number of resolved dependencies
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Whether no dependency was resolved
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// Role hints currently being constructed on one call path
///
/// Scoped to a single top-level lookup: two unrelated lookups may depend on
/// the same slot without that being a cycle.
#[derive(Debug, Clone, Default)]
pub struct ResolutionPath {
    stack: Vec<RoleHint>,
}

impl ResolutionPath {
    /// Empty path for a new top-level lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `role_hint` is under construction on this path
    pub fn contains(&self, role_hint: &RoleHint) -> bool {
        self.stack.contains(role_hint)
    }

    /// Mark `role_hint` as under construction
    ///
    /// Fails with [`Error::LookupCycle`] if it already is.
    pub fn enter(&mut self, role_hint: &RoleHint) -> Result<()> {
        if self.contains(role_hint) {
            let mut chain: Vec<String> = self.stack.iter().map(ToString::to_string).collect();
            chain.push(role_hint.to_string());
            return Err(Error::lookup_cycle(chain.join(" -> ")));
        }
        self.stack.push(role_hint.clone());
        Ok(())
    }

    /// Leave the innermost construction
    pub fn leave(&mut self) {
        self.stack.pop();
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Component registry interface
///
/// All operations are synchronous. Implementations must be safe to share
/// across threads: lookups never block on each other, and the first
/// construction of a singleton happens at most once.
pub trait ComponentRegistry: Send + Sync {
    /// Add or replace the descriptor for its slot
    ///
    /// A supplied `instance` becomes the cached singleton.
    fn register(&self, descriptor: Descriptor, instance: Option<Component>) -> Result<()>;

    /// Remove a slot and release its cached singleton; no-op if absent
    fn unregister(&self, role_hint: &RoleHint) -> Result<()>;

    /// Resolve an instance on an existing call path
    fn resolve(&self, role_hint: &RoleHint, path: &mut ResolutionPath) -> Result<Component>;

    /// Resolve an instance, searching the parent chain
    fn lookup(&self, role_hint: &RoleHint) -> Result<Component> {
        self.resolve(role_hint, &mut ResolutionPath::new())
    }

    /// Every local implementation of `role`, in registration order
    fn lookup_all(&self, role: Role) -> Result<Vec<Component>>;

    /// Every local implementation of `role`, keyed by hint
    fn lookup_map(&self, role: Role) -> Result<HashMap<String, Component>>;

    /// Run the component's shutdown hook and drop it from the singleton cache
    fn release(&self, component: &Component) -> Result<()>;

    /// Whether a descriptor exists here or in the parent chain
    fn has_component(&self, role_hint: &RoleHint) -> Result<bool>;

    /// Whether a descriptor exists in this registry, ignoring the parent chain
    fn has_local_component(&self, role_hint: &RoleHint) -> Result<bool>;

    /// Descriptor for a slot, searching the parent chain
    fn descriptor(&self, role_hint: &RoleHint) -> Result<Option<Arc<Descriptor>>>;

    /// Local descriptors for `role`, in registration order
    fn descriptors(&self, role: Role) -> Result<Vec<Arc<Descriptor>>>;

    /// Every local slot, in registration order
    fn role_hints(&self) -> Result<Vec<RoleHint>>;

    /// Parent registry used for fallback lookups
    fn parent(&self) -> Option<Arc<dyn ComponentRegistry>>;

    /// Replace the parent registry
    fn set_parent(&self, parent: Option<Arc<dyn ComponentRegistry>>);

    /// Replace the sink notified on register/unregister
    fn set_event_sink(&self, sink: Option<Arc<dyn RegistryEventSink>>) -> Result<()>;

    /// Release every cached singleton and forget all registrations
    fn dispose(&self) -> Result<()> {
        Ok(())
    }
}

/// Typed convenience methods over [`ComponentRegistry`]
pub trait ComponentRegistryExt: ComponentRegistry {
    /// Default implementation of role `R`
    fn get<R: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<R>> {
        self.get_named::<R>(DEFAULT_HINT)
    }

    /// Named implementation of role `R`
    fn get_named<R: ?Sized + Send + Sync + 'static>(&self, hint: &str) -> Result<Arc<R>> {
        let component = self.lookup(&RoleHint::named::<R>(hint))?;
        downcast::<R>(&component)
    }

    /// Every local implementation of role `R`, in registration order
    fn get_all<R: ?Sized + Send + Sync + 'static>(&self) -> Result<Vec<Arc<R>>> {
        self.lookup_all(Role::of::<R>())?
            .iter()
            .map(downcast::<R>)
            .collect()
    }

    /// Every local implementation of role `R`, keyed by hint
    fn get_map<R: ?Sized + Send + Sync + 'static>(&self) -> Result<HashMap<String, Arc<R>>> {
        self.lookup_map(Role::of::<R>())?
            .into_iter()
            .map(|(hint, component)| downcast::<R>(&component).map(|instance| (hint, instance)))
            .collect()
    }

    /// Register a ready instance of role `R` as a singleton
    fn register_instance<R: ?Sized + Send + Sync + 'static>(
        &self,
        hint: Option<&str>,
        instance: Arc<R>,
    ) -> Result<()> {
        let role_hint = RoleHint::new(Role::of::<R>(), hint);
        self.register(
            Descriptor::for_instance(role_hint),
            Some(Component::new::<R>(instance)),
        )
    }

    /// Register a typed constructor for role `R` with default settings
    ///
    /// Singleton, no declared dependencies. Use [`Descriptor::builder`] for
    /// anything more elaborate.
    fn register_factory<R, F>(&self, hint: Option<&str>, constructor: F) -> Result<()>
    where
        R: ?Sized + Send + Sync + 'static,
        F: Fn(&Dependencies) -> Result<Arc<R>> + Send + Sync + 'static,
    {
        let mut builder = Descriptor::builder::<R>().constructor(constructor);
        if let Some(hint) = hint {
            builder = builder.hint(hint);
        }
        self.register(builder.build(), None)
    }

    /// Whether the default implementation of role `R` is registered
    fn has<R: ?Sized + 'static>(&self) -> Result<bool> {
        self.has_component(&RoleHint::of::<R>())
    }
}

impl<T: ComponentRegistry + ?Sized> ComponentRegistryExt for T {}

fn downcast<R: ?Sized + Send + Sync + 'static>(component: &Component) -> Result<Arc<R>> {
    component.downcast::<R>().ok_or_else(|| {
        Error::internal(format!(
            "component built for {} cannot be used as {}",
            component.role(),
            Role::of::<R>()
        ))
    })
}
