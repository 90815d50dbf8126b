//! Execution frames
//!
//! An [`ExecutionFrame`] is the request-scoped property bag carried by one
//! level of the execution stack. Frames are cheap `Rc` handles: cloning the
//! handle shares the frame, it does not copy it. They are neither `Send` nor
//! `Sync`, so a frame never leaves the thread that created it.
//!
//! ## Usage
//!
//! ```
//! use nsc_domain::execution::ExecutionFrame;
//!
//! let frame = ExecutionFrame::new();
//! frame.declare("namespace").initial("wiki:acme").inherited().make_final().commit()?;
//! frame.set("locale", "fr")?;
//!
//! assert_eq!(frame.get::<String>("namespace").as_deref(), Some("wiki:acme"));
//! assert!(frame.set("namespace", "wiki:other").is_err());
//! # Ok::<(), nsc_domain::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::execution::property::{Property, PropertyInfo};
use crate::execution::value::{PropertyValue, ValueType};
use indexmap::IndexMap;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct FrameState {
    properties: IndexMap<String, Property>,
}

/// Handle to one level of the execution stack
#[derive(Clone, Default)]
pub struct ExecutionFrame {
    state: Rc<RefCell<FrameState>>,
}

impl ExecutionFrame {
    /// Empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Start declaring a property with constraints
    pub fn declare(&self, key: impl Into<String>) -> PropertyDeclaration<'_> {
        PropertyDeclaration {
            frame: self,
            property: Property::new(key, None),
        }
    }

    /// Add a fully built property
    ///
    /// Fails when the key is already declared or the value breaks a constraint.
    pub fn insert(&self, property: Property) -> Result<()> {
        property.validate()?;
        let mut state = self.state.borrow_mut();
        if state.properties.contains_key(property.key()) {
            return Err(Error::constraint_violation(
                property.key(),
                "property is already declared",
            ));
        }
        state.properties.insert(property.key().to_string(), property);
        Ok(())
    }

    /// Write a value; unknown keys become plain properties
    pub fn set_value(&self, key: &str, value: Option<PropertyValue>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match state.properties.get_mut(key) {
            Some(property) => property.set_value(value),
            None => {
                state
                    .properties
                    .insert(key.to_string(), Property::new(key, value));
                Ok(())
            }
        }
    }

    /// Write a value converted into a [`PropertyValue`]
    pub fn set(&self, key: &str, value: impl Into<PropertyValue>) -> Result<()> {
        self.set_value(key, Some(value.into()))
    }

    /// Shared handle to the value of `key`
    pub fn value(&self, key: &str) -> Option<PropertyValue> {
        self.state
            .borrow()
            .properties
            .get(key)
            .and_then(|p| p.value().cloned())
    }

    /// Copy of the value of `key` when it is a `T`
    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.value(key)
            .and_then(|value| value.downcast_ref::<T>().cloned())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.borrow().properties.contains_key(key)
    }

    /// Keys in declaration order
    pub fn keys(&self) -> Vec<String> {
        self.state.borrow().properties.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().properties.is_empty()
    }

    /// Remove a property and return its value
    ///
    /// Final properties cannot be removed.
    pub fn remove(&self, key: &str) -> Result<Option<PropertyValue>> {
        let mut state = self.state.borrow_mut();
        if state.properties.get(key).is_some_and(Property::is_final) {
            return Err(Error::constraint_violation(
                key,
                "final property cannot be removed",
            ));
        }
        Ok(state
            .properties
            .shift_remove(key)
            .and_then(|p| p.value().cloned()))
    }

    /// Borrow a property
    ///
    /// The borrow must end before the frame is written to again.
    pub fn property(&self, key: &str) -> Option<Ref<'_, Property>> {
        Ref::filter_map(self.state.borrow(), |state| state.properties.get(key)).ok()
    }

    /// Flags of a property
    pub fn property_info(&self, key: &str) -> Option<PropertyInfo> {
        self.state.borrow().properties.get(key).map(Property::info)
    }

    /// Flags of every property, in declaration order
    pub fn properties_info(&self) -> Vec<PropertyInfo> {
        self.state
            .borrow()
            .properties
            .values()
            .map(Property::info)
            .collect()
    }

    /// Copy the inherited properties of `source` into this frame
    ///
    /// Keys already present here are kept, except that a key `source` marks
    /// inherited and final must hold a property cloned from the source's;
    /// otherwise the whole call fails and this frame is left untouched.
    pub fn inherit_from(&self, source: &ExecutionFrame) -> Result<()> {
        if Self::ptr_eq(self, source) {
            return Ok(());
        }
        let source_state = source.state.borrow();
        let mut clones = Vec::new();
        {
            let target = self.state.borrow();
            for (key, property) in source_state
                .properties
                .iter()
                .filter(|(_, p)| p.is_inherited())
            {
                match target.properties.get(key) {
                    Some(existing) => {
                        if property.is_final() && !existing.is_cloned_from(property) {
                            return Err(Error::constraint_violation(
                                key.as_str(),
                                "inherited final property is already set to a value not cloned from it",
                            ));
                        }
                    }
                    None => clones.push(property.try_clone()?),
                }
            }
        }
        let mut target = self.state.borrow_mut();
        for clone in clones {
            target.properties.insert(clone.key().to_string(), clone);
        }
        Ok(())
    }

    /// Whether both handles point at the same frame
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.state, &b.state)
    }
}

impl fmt::Debug for ExecutionFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f
                .debug_struct("ExecutionFrame")
                .field("properties", &state.properties.values().collect::<Vec<_>>())
                .finish(),
            Err(_) => f.write_str("ExecutionFrame { <borrowed> }"),
        }
    }
}

/// Builder returned by [`ExecutionFrame::declare`]
#[must_use = "a declaration does nothing until `commit` is called"]
pub struct PropertyDeclaration<'a> {
    frame: &'a ExecutionFrame,
    property: Property,
}

impl PropertyDeclaration<'_> {
    /// Initial value
    pub fn initial(self, value: impl Into<PropertyValue>) -> Self {
        self.value(Some(value.into()))
    }

    /// Initial value, possibly absent
    pub fn value(mut self, value: Option<PropertyValue>) -> Self {
        self.property = self.property.with_value(value);
        self
    }

    pub fn inherited(mut self) -> Self {
        self.property = self.property.inherited();
        self
    }

    pub fn make_final(mut self) -> Self {
        self.property = self.property.make_final();
        self
    }

    pub fn non_null(mut self) -> Self {
        self.property = self.property.non_null();
        self
    }

    pub fn typed<T: 'static>(mut self) -> Self {
        self.property = self.property.typed_as(ValueType::of::<T>());
        self
    }

    pub fn clone_value(mut self) -> Self {
        self.property = self.property.clone_value();
        self
    }

    /// Validate and add the property to the frame
    pub fn commit(self) -> Result<()> {
        self.frame.insert(self.property)
    }
}
