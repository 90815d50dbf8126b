//! Unit tests for Role and RoleHint

use nsc_domain::{Role, RoleHint};
use std::collections::HashSet;

trait Cache: Send + Sync {}
trait Store: Send + Sync {}

#[test]
fn test_role_identity_by_type() {
    assert_eq!(Role::of::<dyn Cache>(), Role::of::<dyn Cache>());
    assert_ne!(Role::of::<dyn Cache>(), Role::of::<dyn Store>());
    assert!(Role::of::<dyn Cache>().name().contains("Cache"));
}

#[test]
fn test_role_hint_defaults_to_default_hint() {
    let role_hint = RoleHint::of::<dyn Cache>();
    assert_eq!(role_hint.hint(), "default");
    assert!(role_hint.is_default());
    assert_eq!(role_hint, RoleHint::new(Role::of::<dyn Cache>(), None));
    assert_eq!(role_hint, RoleHint::named::<dyn Cache>("default"));
}

#[test]
fn test_role_hint_equality_uses_both_parts() {
    let lru = RoleHint::named::<dyn Cache>("lru");
    assert_ne!(lru, RoleHint::of::<dyn Cache>());
    assert_ne!(lru, RoleHint::named::<dyn Store>("lru"));

    let set: HashSet<RoleHint> = [
        RoleHint::named::<dyn Cache>("lru"),
        RoleHint::named::<dyn Cache>("lru"),
        RoleHint::of::<dyn Cache>(),
    ]
    .into_iter()
    .collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_role_hint_display() {
    let display = RoleHint::named::<dyn Cache>("lru").to_string();
    assert!(display.contains("Cache"));
    assert!(display.ends_with("[lru]"));
}
