//! Role and RoleHint value objects
//!
//! A [`Role`] identifies the service contract a component implements. It is
//! keyed by the contract's `TypeId`, so `dyn Cache` and `dyn Store` are
//! distinct roles even if they share a name. A [`RoleHint`] adds the hint
//! string that disambiguates implementations of the same role.

use crate::constants::DEFAULT_HINT;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Service contract identifier
#[derive(Clone, Copy)]
pub struct Role {
    id: TypeId,
    name: &'static str,
}

impl Role {
    /// Role for the contract type `R` (usually a trait object such as `dyn Cache`)
    pub fn of<R: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<R>(),
            name: std::any::type_name::<R>(),
        }
    }

    /// Type identifier of the contract
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Type name of the contract, for diagnostics only
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Role").field(&self.name).finish()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Registration slot key: a role plus a hint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleHint {
    role: Role,
    hint: String,
}

impl RoleHint {
    /// Create a role hint; an absent hint maps to [`DEFAULT_HINT`]
    pub fn new(role: Role, hint: Option<&str>) -> Self {
        Self {
            role,
            hint: hint.unwrap_or(DEFAULT_HINT).to_string(),
        }
    }

    /// Default-hint slot for role `R`
    pub fn of<R: ?Sized + 'static>() -> Self {
        Self::new(Role::of::<R>(), None)
    }

    /// Named slot for role `R`
    pub fn named<R: ?Sized + 'static>(hint: impl Into<String>) -> Self {
        Self {
            role: Role::of::<R>(),
            hint: hint.into(),
        }
    }

    /// The role part
    pub fn role(&self) -> Role {
        self.role
    }

    /// The hint part
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// Whether this slot uses the default hint
    pub fn is_default(&self) -> bool {
        self.hint == DEFAULT_HINT
    }
}

impl fmt::Display for RoleHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.role, self.hint)
    }
}
