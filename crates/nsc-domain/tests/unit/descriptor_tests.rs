//! Unit tests for Descriptor and its builder

use nsc_domain::{
    Component, ComponentFactory, Dependencies, Descriptor, InstantiationStrategy, RoleHint,
};
use std::sync::Arc;

trait Store: Send + Sync {
    fn name(&self) -> &str;
}

trait Cache: Send + Sync {}

struct MemoryStore;

impl Store for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }
}

#[test]
fn test_builder_defaults() {
    let descriptor = Descriptor::builder::<dyn Store>().build();
    assert_eq!(descriptor.role_hint(), &RoleHint::of::<dyn Store>());
    assert_eq!(descriptor.strategy(), InstantiationStrategy::Singleton);
    assert!(descriptor.dependencies().is_empty());
    assert!(descriptor.factory().is_none());
    assert!(descriptor.implementation().is_none());
}

#[test]
fn test_builder_full() {
    let descriptor = Descriptor::builder::<dyn Store>()
        .hint("memory")
        .per_lookup()
        .depends_on::<dyn Cache>()
        .depends_on_named::<dyn Cache>("lru")
        .implementation("MemoryStore")
        .constructor(|_deps| {
            let store: Arc<dyn Store> = Arc::new(MemoryStore);
            Ok(store)
        })
        .build();

    assert_eq!(descriptor.role_hint().hint(), "memory");
    assert_eq!(descriptor.strategy(), InstantiationStrategy::PerLookup);
    assert_eq!(
        descriptor.dependencies(),
        &[
            RoleHint::of::<dyn Cache>(),
            RoleHint::named::<dyn Cache>("lru")
        ]
    );
    assert_eq!(descriptor.implementation(), Some("MemoryStore"));

    let component = descriptor
        .factory()
        .unwrap()
        .create(&Dependencies::new())
        .unwrap();
    assert_eq!(component.downcast::<dyn Store>().unwrap().name(), "memory");
}

#[test]
fn test_raw_factory_closure() {
    let descriptor = Descriptor::builder::<dyn Store>()
        .factory(|_deps: &Dependencies| {
            let store: Arc<dyn Store> = Arc::new(MemoryStore);
            Ok(Component::new::<dyn Store>(store))
        })
        .build();
    assert!(descriptor.factory().is_some());
}

#[test]
fn test_for_instance_has_no_factory() {
    let descriptor = Descriptor::for_instance(RoleHint::named::<dyn Store>("ready"));
    assert!(descriptor.factory().is_none());
    assert_eq!(descriptor.strategy(), InstantiationStrategy::Singleton);
}

#[test]
fn test_strategy_serializes() {
    let json = serde_json::to_string(&InstantiationStrategy::PerLookup).unwrap();
    assert_eq!(json, "\"PerLookup\"");
}
