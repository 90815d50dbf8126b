//! Execution frame properties
//!
//! A [`Property`] is one keyed entry of an execution frame together with its
//! constraints:
//!
//! | Flag | Effect |
//! |------|--------|
//! | `inherited` | copied into frames pushed on top of the owning frame |
//! | `final` | once it holds a value, cannot be written again |
//! | `non_null` | must always hold a value |
//! | `declared type` | value's runtime type must match exactly |
//! | `clone_value` | inheritance copies the value instead of sharing it |
//!
//! Every property has an identity anchor. Cloning an inherited final property
//! records a weak reference to the source anchor, which is how a frame proves
//! that it legitimately holds its own copy of a final value.

use crate::error::{Error, Result};
use crate::execution::value::{PropertyValue, ValueType};
use serde::Serialize;
use std::fmt;
use std::rc::{Rc, Weak};

struct Anchor;

/// One keyed entry of an execution frame
pub struct Property {
    key: String,
    value: Option<PropertyValue>,
    clone_value: bool,
    is_final: bool,
    inherited: bool,
    non_null: bool,
    declared_type: Option<ValueType>,
    anchor: Rc<Anchor>,
    cloned_from: Option<Weak<Anchor>>,
}

impl Property {
    /// Plain property: not final, not inherited, no constraints
    pub fn new(key: impl Into<String>, value: Option<PropertyValue>) -> Self {
        Self {
            key: key.into(),
            value,
            clone_value: false,
            is_final: false,
            inherited: false,
            non_null: false,
            declared_type: None,
            anchor: Rc::new(Anchor),
            cloned_from: None,
        }
    }

    /// Replace the value without checking constraints
    ///
    /// Constraints are checked when the property is added to a frame.
    pub fn with_value(mut self, value: Option<PropertyValue>) -> Self {
        self.value = value;
        self
    }

    /// Mark as inherited by frames pushed on top
    pub fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }

    /// Mark as final
    pub fn make_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Require a value at all times
    pub fn non_null(mut self) -> Self {
        self.non_null = true;
        self
    }

    /// Require values of exactly type `T`
    pub fn typed<T: 'static>(self) -> Self {
        self.typed_as(ValueType::of::<T>())
    }

    /// Require values of exactly `value_type`
    pub fn typed_as(mut self, value_type: ValueType) -> Self {
        self.declared_type = Some(value_type);
        self
    }

    /// Copy the value, rather than share it, when inherited
    pub fn clone_value(mut self) -> Self {
        self.clone_value = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&PropertyValue> {
        self.value.as_ref()
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn is_inherited(&self) -> bool {
        self.inherited
    }

    pub fn is_non_null(&self) -> bool {
        self.non_null
    }

    pub fn is_clone_value(&self) -> bool {
        self.clone_value
    }

    pub fn declared_type(&self) -> Option<ValueType> {
        self.declared_type
    }

    /// Check the current value against the non-null and type constraints
    pub fn validate(&self) -> Result<()> {
        self.check_value(self.value.as_ref())
    }

    fn check_value(&self, value: Option<&PropertyValue>) -> Result<()> {
        match (value, self.declared_type) {
            (None, _) if self.non_null => Err(Error::constraint_violation(
                &self.key,
                "non-null property cannot be empty",
            )),
            (Some(value), Some(expected)) if value.value_type() != expected => {
                Err(Error::constraint_violation(
                    &self.key,
                    format!(
                        "expected a value of type {expected}, got {}",
                        value.value_type()
                    ),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Write a new value, enforcing every constraint
    pub fn set_value(&mut self, value: Option<PropertyValue>) -> Result<()> {
        if self.is_final && self.value.is_some() {
            return Err(Error::constraint_violation(
                &self.key,
                "final property already holds a value",
            ));
        }
        self.check_value(value.as_ref())?;
        self.value = value;
        Ok(())
    }

    /// Copy of this property for an inheriting frame
    ///
    /// The copy gets a fresh identity. Its value is copied when the property
    /// is flagged `clone_value` and shared otherwise.
    ///
    /// # Errors
    ///
    /// [`Error::NotCopyable`] when `clone_value` is set but the value has no
    /// copy operation.
    pub fn try_clone(&self) -> Result<Self> {
        let value = match &self.value {
            Some(value) if self.clone_value => Some(
                value
                    .try_copy()
                    .ok_or_else(|| Error::not_copyable(&self.key, value.value_type().name()))?,
            ),
            other => other.clone(),
        };
        let cloned_from = (self.inherited && self.is_final).then(|| Rc::downgrade(&self.anchor));
        Ok(Self {
            key: self.key.clone(),
            value,
            clone_value: self.clone_value,
            is_final: self.is_final,
            inherited: self.inherited,
            non_null: self.non_null,
            declared_type: self.declared_type,
            anchor: Rc::new(Anchor),
            cloned_from,
        })
    }

    /// Whether this property was cloned from `source`
    ///
    /// Only holds while `source` is alive; the back-reference is weak.
    pub fn is_cloned_from(&self, source: &Property) -> bool {
        self.cloned_from
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|anchor| Rc::ptr_eq(&anchor, &source.anchor))
    }

    /// Serializable summary of the property's flags
    pub fn info(&self) -> PropertyInfo {
        PropertyInfo {
            key: self.key.clone(),
            has_value: self.value.is_some(),
            value_type: self.value.as_ref().map(|v| v.value_type().name()),
            declared_type: self.declared_type.map(|t| t.name()),
            is_final: self.is_final,
            inherited: self.inherited,
            non_null: self.non_null,
            clone_value: self.clone_value,
            cloned: self.cloned_from.is_some(),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("final", &self.is_final)
            .field("inherited", &self.inherited)
            .field("non_null", &self.non_null)
            .field("declared_type", &self.declared_type)
            .field("clone_value", &self.clone_value)
            .finish()
    }
}

/// Snapshot of a property's flags, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyInfo {
    pub key: String,
    pub has_value: bool,
    pub value_type: Option<&'static str>,
    pub declared_type: Option<&'static str>,
    pub is_final: bool,
    pub inherited: bool,
    pub non_null: bool,
    pub clone_value: bool,
    /// Whether the property was cloned from an inherited final source
    pub cloned: bool,
}
