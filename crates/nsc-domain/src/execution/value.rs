//! Property values
//!
//! Values stored in an execution frame are opaque, reference counted and
//! confined to the thread that owns the frame. A value may carry a copy
//! operation, which properties flagged `clone_value` use when a frame
//! inherits them.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

type Copier = fn(&dyn Any) -> Option<Rc<dyn Any>>;

/// Runtime type of a property value
#[derive(Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    /// Value type of `T`
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Type name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueType {}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Opaque value held by a frame property
///
/// Cloning the handle shares the underlying value.
#[derive(Clone)]
pub struct PropertyValue {
    value: Rc<dyn Any>,
    value_type: ValueType,
    copier: Option<Copier>,
}

impl PropertyValue {
    /// Value without a copy operation
    pub fn new<T: 'static>(value: T) -> Self {
        Self::shared(Rc::new(value))
    }

    /// Value already behind an `Rc`, without a copy operation
    pub fn shared<T: 'static>(value: Rc<T>) -> Self {
        Self {
            value,
            value_type: ValueType::of::<T>(),
            copier: None,
        }
    }

    /// Value that can be copied through `Clone`
    pub fn copyable<T: Clone + 'static>(value: T) -> Self {
        Self {
            value: Rc::new(value),
            value_type: ValueType::of::<T>(),
            copier: Some(copy_value::<T>),
        }
    }

    /// Runtime type of the value
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether the value carries a copy operation
    pub fn is_copyable(&self) -> bool {
        self.copier.is_some()
    }

    /// Independent copy of the value, if it is copyable
    pub fn try_copy(&self) -> Option<Self> {
        let copier = self.copier?;
        copier(&*self.value).map(|value| Self {
            value,
            value_type: self.value_type,
            copier: self.copier,
        })
    }

    /// Borrow the value as `T`
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Shared handle to the value as `T`
    pub fn downcast<T: 'static>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.value).downcast::<T>().ok()
    }

    /// Whether both handles share the same value
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.value, &b.value)
    }
}

fn copy_value<T: Clone + 'static>(value: &dyn Any) -> Option<Rc<dyn Any>> {
    value
        .downcast_ref::<T>()
        .map(|inner| Rc::new(inner.clone()) as Rc<dyn Any>)
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyValue")
            .field("type", &self.value_type)
            .field("copyable", &self.is_copyable())
            .finish()
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::copyable(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::copyable(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::copyable(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::copyable(value)
    }
}
