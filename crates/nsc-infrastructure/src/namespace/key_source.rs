//! Namespace key sources

use crate::constants::DEFAULT_NAMESPACE_KEY_PROPERTY;
use nsc_domain::ports::{Execution, NamespaceKeySource};
use std::sync::Arc;

/// Reads the namespace key from a string property of the current frame
///
/// No current frame, a missing property or a non-string value all mean the
/// root namespace.
#[derive(Clone)]
pub struct FramePropertyKeySource {
    execution: Arc<dyn Execution>,
    property: String,
}

impl FramePropertyKeySource {
    /// Key source reading the default `namespace` property
    pub fn new(execution: Arc<dyn Execution>) -> Self {
        Self::with_property(execution, DEFAULT_NAMESPACE_KEY_PROPERTY)
    }

    /// Key source reading `property`
    pub fn with_property(execution: Arc<dyn Execution>, property: impl Into<String>) -> Self {
        Self {
            execution,
            property: property.into(),
        }
    }

    /// Property the key is read from
    pub fn property(&self) -> &str {
        &self.property
    }
}

impl NamespaceKeySource for FramePropertyKeySource {
    fn current_key(&self) -> Option<String> {
        self.execution
            .current()
            .and_then(|frame| frame.get::<String>(&self.property))
    }
}

/// Always reports the same key
#[derive(Debug, Clone, Default)]
pub struct FixedKeySource {
    key: Option<String>,
}

impl FixedKeySource {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    /// Source that always reports the root namespace
    pub fn root() -> Self {
        Self::default()
    }
}

impl NamespaceKeySource for FixedKeySource {
    fn current_key(&self) -> Option<String> {
        self.key.clone()
    }
}
