//! Constructed component handles
//!
//! A [`Component`] wraps an instance built for a role. The instance is kept as
//! `Arc<R>` for the role `R` it was registered under, so typed access is a
//! plain downcast and trait-object roles (`dyn Cache`) work without
//! reflection. The handle also carries the optional shutdown hook and makes
//! release idempotent.

use crate::ports::registry::Disposable;
use crate::value_objects::Role;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

struct ComponentInner {
    role: Role,
    instance: Box<dyn Any + Send + Sync>,
    shutdown: Option<Arc<dyn Disposable>>,
    released: AtomicBool,
}

/// Shared handle to a constructed component instance
#[derive(Clone)]
pub struct Component {
    inner: Arc<ComponentInner>,
}

impl Component {
    /// Wrap an instance for role `R`
    pub fn new<R: ?Sized + Send + Sync + 'static>(instance: Arc<R>) -> Self {
        Self::build(instance, None)
    }

    /// Wrap an instance for role `R` that exposes a shutdown hook
    ///
    /// The hook runs once, on the first [`Component::release`].
    pub fn with_shutdown<R: ?Sized + Send + Sync + 'static>(
        instance: Arc<R>,
        hook: Arc<dyn Disposable>,
    ) -> Self {
        Self::build(instance, Some(hook))
    }

    fn build<R: ?Sized + Send + Sync + 'static>(
        instance: Arc<R>,
        shutdown: Option<Arc<dyn Disposable>>,
    ) -> Self {
        Self {
            inner: Arc::new(ComponentInner {
                role: Role::of::<R>(),
                instance: Box::new(instance),
                shutdown,
                released: AtomicBool::new(false),
            }),
        }
    }

    /// Role the instance was built for
    pub fn role(&self) -> Role {
        self.inner.role
    }

    /// Typed access to the instance
    pub fn downcast<R: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<R>> {
        self.inner.instance.downcast_ref::<Arc<R>>().cloned()
    }

    /// Whether the instance exposes a shutdown hook
    pub fn has_shutdown_hook(&self) -> bool {
        self.inner.shutdown.is_some()
    }

    /// Whether [`Component::release`] has already run
    pub fn is_released(&self) -> bool {
        self.inner.released.load(Ordering::Acquire)
    }

    /// Run the shutdown hook if present
    ///
    /// Returns `false` when the component had already been released.
    pub fn release(&self) -> bool {
        if self.inner.released.swap(true, Ordering::AcqRel) {
            return false;
        }
        if let Some(hook) = &self.inner.shutdown {
            hook.dispose();
        }
        true
    }

    /// Identity comparison of two handles
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("role", &self.inner.role)
            .field("has_shutdown_hook", &self.has_shutdown_hook())
            .field("released", &self.is_released())
            .finish()
    }
}
