//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the namespaced component runtime
#[derive(Error, Debug)]
pub enum Error {
    /// No descriptor was found in the registry or anywhere in its parent chain
    #[error("Component not found: {role_hint}")]
    NotFound {
        /// The role and hint that were looked up
        role_hint: String,
    },

    /// A dependency re-entered the construction of a component on the same call path
    #[error("Component lookup cycle detected: {path}")]
    LookupCycle {
        /// The resolution path, ending with the re-entered role hint
        path: String,
    },

    /// A property write violated its final, non-null or type constraint
    #[error("Constraint violation on property [{key}]: {reason}")]
    ConstraintViolation {
        /// Property key
        key: String,
        /// Which constraint was violated
        reason: String,
    },

    /// A property asked for value cloning but its value has no copy operation
    #[error("Value of property [{key}] ({type_name}) cannot be copied")]
    NotCopyable {
        /// Property key
        key: String,
        /// Runtime type of the value
        type_name: String,
    },

    /// A namespace proxy was used without an internal parent registry
    #[error("Misconfigured namespace proxy: {message}")]
    MisconfiguredProxy {
        /// Description of the misconfiguration
        message: String,
    },

    /// `pop` was called on an empty execution stack
    #[error("Execution stack is empty")]
    EmptyStack,

    /// A component factory failed or produced an instance of the wrong role
    #[error("Failed to instantiate component {role_hint}: {message}")]
    Instantiation {
        /// The role and hint being constructed
        role_hint: String,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// Internal error (broken invariant)
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

// Registry error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(role_hint: S) -> Self {
        Self::NotFound {
            role_hint: role_hint.into(),
        }
    }

    /// Create a lookup cycle error
    pub fn lookup_cycle<S: Into<String>>(path: S) -> Self {
        Self::LookupCycle { path: path.into() }
    }

    /// Create an instantiation error
    pub fn instantiation<R: Into<String>, S: Into<String>>(role_hint: R, message: S) -> Self {
        Self::Instantiation {
            role_hint: role_hint.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an instantiation error with source
    pub fn instantiation_with_source<
        R: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        role_hint: R,
        message: S,
        source: E,
    ) -> Self {
        Self::Instantiation {
            role_hint: role_hint.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a misconfigured proxy error
    pub fn misconfigured_proxy<S: Into<String>>(message: S) -> Self {
        Self::MisconfiguredProxy {
            message: message.into(),
        }
    }
}

// Execution error creation methods
impl Error {
    /// Create a constraint violation error
    pub fn constraint_violation<K: Into<String>, S: Into<String>>(key: K, reason: S) -> Self {
        Self::ConstraintViolation {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a not copyable error
    pub fn not_copyable<K: Into<String>, S: Into<String>>(key: K, type_name: S) -> Self {
        Self::NotCopyable {
            key: key.into(),
            type_name: type_name.into(),
        }
    }
}

// Configuration, internal and infrastructure error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Classification helpers
impl Error {
    /// True for [`Error::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for [`Error::LookupCycle`]
    pub fn is_lookup_cycle(&self) -> bool {
        matches!(self, Self::LookupCycle { .. })
    }

    /// True for [`Error::ConstraintViolation`]
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }

    /// True for [`Error::NotCopyable`]
    pub fn is_not_copyable(&self) -> bool {
        matches!(self, Self::NotCopyable { .. })
    }

    /// True for [`Error::MisconfiguredProxy`]
    pub fn is_misconfigured_proxy(&self) -> bool {
        matches!(self, Self::MisconfiguredProxy { .. })
    }

    /// True for [`Error::EmptyStack`]
    pub fn is_empty_stack(&self) -> bool {
        matches!(self, Self::EmptyStack)
    }
}
