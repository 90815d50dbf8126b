//! Component descriptors
//!
//! A [`Descriptor`] is the immutable registration record for one
//! implementation: the slot it fills, how instances are shared, which other
//! slots must be injected into it, and the factory that builds it.
//!
//! ## Usage
//!
//! ```
//! use nsc_domain::value_objects::Descriptor;
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let descriptor = Descriptor::builder::<dyn Greeter>()
//!     .hint("english")
//!     .constructor(|_deps| {
//!         let greeter: Arc<dyn Greeter> = Arc::new(English);
//!         Ok(greeter)
//!     })
//!     .build();
//!
//! assert_eq!(descriptor.role_hint().hint(), "english");
//! ```

use crate::entities::Component;
use crate::error::Result;
use crate::ports::registry::{ComponentFactory, Dependencies};
use crate::value_objects::role::{Role, RoleHint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// How a registry shares instances of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InstantiationStrategy {
    /// One instance per registry, built on first lookup and cached
    #[default]
    Singleton,
    /// A fresh instance, with freshly resolved dependencies, on every lookup
    PerLookup,
}

/// Immutable registration record for one component implementation
#[derive(Clone)]
pub struct Descriptor {
    role_hint: RoleHint,
    strategy: InstantiationStrategy,
    dependencies: Vec<RoleHint>,
    factory: Option<Arc<dyn ComponentFactory>>,
    implementation: Option<String>,
}

impl Descriptor {
    /// Start building a descriptor for role `R`
    pub fn builder<R: ?Sized + Send + Sync + 'static>() -> DescriptorBuilder<R> {
        DescriptorBuilder {
            role: Role::of::<R>(),
            hint: None,
            strategy: InstantiationStrategy::default(),
            dependencies: Vec::new(),
            factory: None,
            implementation: None,
            _role: PhantomData,
        }
    }

    /// Descriptor without a factory, for components registered with a ready instance
    pub fn for_instance(role_hint: RoleHint) -> Self {
        Self {
            role_hint,
            strategy: InstantiationStrategy::Singleton,
            dependencies: Vec::new(),
            factory: None,
            implementation: None,
        }
    }

    /// The slot this descriptor fills
    pub fn role_hint(&self) -> &RoleHint {
        &self.role_hint
    }

    /// Instance sharing strategy
    pub fn strategy(&self) -> InstantiationStrategy {
        self.strategy
    }

    /// Slots injected into the component, in declaration order
    pub fn dependencies(&self) -> &[RoleHint] {
        &self.dependencies
    }

    /// Factory used to construct instances, if any
    pub fn factory(&self) -> Option<&Arc<dyn ComponentFactory>> {
        self.factory.as_ref()
    }

    /// Implementation name, for diagnostics
    pub fn implementation(&self) -> Option<&str> {
        self.implementation.as_deref()
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("role_hint", &self.role_hint)
            .field("strategy", &self.strategy)
            .field("dependencies", &self.dependencies)
            .field("implementation", &self.implementation)
            .field("has_factory", &self.factory.is_some())
            .finish()
    }
}

/// Builder for [`Descriptor`], typed by the role it registers
pub struct DescriptorBuilder<R: ?Sized> {
    role: Role,
    hint: Option<String>,
    strategy: InstantiationStrategy,
    dependencies: Vec<RoleHint>,
    factory: Option<Arc<dyn ComponentFactory>>,
    implementation: Option<String>,
    _role: PhantomData<fn() -> Box<R>>,
}

impl<R: ?Sized + Send + Sync + 'static> DescriptorBuilder<R> {
    /// Register under `hint` instead of the default hint
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Set the instantiation strategy
    pub fn strategy(mut self, strategy: InstantiationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Shorthand for [`InstantiationStrategy::PerLookup`]
    pub fn per_lookup(self) -> Self {
        self.strategy(InstantiationStrategy::PerLookup)
    }

    /// Declare a dependency on an explicit slot
    pub fn dependency(mut self, role_hint: RoleHint) -> Self {
        self.dependencies.push(role_hint);
        self
    }

    /// Declare a dependency on the default implementation of role `D`
    pub fn depends_on<D: ?Sized + 'static>(self) -> Self {
        self.dependency(RoleHint::of::<D>())
    }

    /// Declare a dependency on a named implementation of role `D`
    pub fn depends_on_named<D: ?Sized + 'static>(self, hint: impl Into<String>) -> Self {
        self.dependency(RoleHint::named::<D>(hint))
    }

    /// Record the implementation name shown in diagnostics
    pub fn implementation(mut self, name: impl Into<String>) -> Self {
        self.implementation = Some(name.into());
        self
    }

    /// Use a raw factory that builds [`Component`] handles itself
    ///
    /// Needed when the instance exposes a shutdown hook.
    pub fn factory<F: ComponentFactory + 'static>(mut self, factory: F) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Use a typed constructor returning `Arc<R>`
    pub fn constructor<F>(self, constructor: F) -> Self
    where
        F: Fn(&Dependencies) -> Result<Arc<R>> + Send + Sync + 'static,
    {
        self.factory(move |deps: &Dependencies| constructor(deps).map(Component::new::<R>))
    }

    /// Finish the descriptor
    pub fn build(self) -> Descriptor {
        Descriptor {
            role_hint: RoleHint::new(self.role, self.hint.as_deref()),
            strategy: self.strategy,
            dependencies: self.dependencies,
            factory: self.factory,
            implementation: self.implementation,
        }
    }
}
