//! Component registry behaviour: lifecycles, dependencies, cycles, events

use crate::test_utils::*;
use nsc_domain::entities::Component;
use nsc_domain::ports::{ComponentRegistry, ComponentRegistryExt, Dependencies};
use nsc_domain::value_objects::{Descriptor, Role, RoleHint};
use nsc_infrastructure::registry::DefaultComponentRegistry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_singleton_lookups_construct_once() {
    let registry = Arc::new(DefaultComponentRegistry::new());
    let constructed = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&constructed);
    registry
        .register_factory::<dyn Greeter, _>(None, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            Ok(english())
        })
        .unwrap();

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.get::<dyn Greeter>().unwrap()
            })
        })
        .collect();

    let instances: Vec<Arc<dyn Greeter>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], instance));
    }
}

#[test]
fn test_per_lookup_returns_distinct_instances() {
    let registry = DefaultComponentRegistry::new();
    registry
        .register(
            Descriptor::builder::<dyn Greeter>()
                .per_lookup()
                .constructor(|_| Ok(english()))
                .build(),
            None,
        )
        .unwrap();

    let first = registry.get::<dyn Greeter>().unwrap();
    let second = registry.get::<dyn Greeter>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.greet(), "hello");
}

#[test]
fn test_unregister_makes_lookup_fail_until_registered_again() {
    let registry = DefaultComponentRegistry::new();
    registry
        .register_instance::<dyn Greeter>(None, english())
        .unwrap();
    assert!(registry.has::<dyn Greeter>().unwrap());

    registry.unregister(&RoleHint::of::<dyn Greeter>()).unwrap();
    let error = registry.get::<dyn Greeter>().err().unwrap();
    assert!(error.is_not_found());
    assert!(!registry.has::<dyn Greeter>().unwrap());

    // Unregistering an absent slot is a no-op
    registry.unregister(&RoleHint::of::<dyn Greeter>()).unwrap();

    registry
        .register_instance::<dyn Greeter>(None, french())
        .unwrap();
    assert_eq!(registry.get::<dyn Greeter>().unwrap().greet(), "bonjour");
}

#[test]
fn test_dependency_cycle_is_detected() {
    let registry = DefaultComponentRegistry::new();
    registry
        .register(
            Descriptor::builder::<dyn Alpha>()
                .depends_on::<dyn Beta>()
                .constructor(|_| Ok(Arc::new(AlphaImpl) as Arc<dyn Alpha>))
                .build(),
            None,
        )
        .unwrap();
    registry
        .register(
            Descriptor::builder::<dyn Beta>()
                .depends_on::<dyn Alpha>()
                .constructor(|_| Ok(Arc::new(BetaImpl) as Arc<dyn Beta>))
                .build(),
            None,
        )
        .unwrap();

    let error = registry.get::<dyn Alpha>().err().unwrap();
    assert!(error.is_lookup_cycle());
    let message = error.to_string();
    assert!(message.contains("Alpha"));
    assert!(message.contains("Beta"));

    // The failed lookup leaves nothing half-built behind
    let error = registry.get::<dyn Beta>().err().unwrap();
    assert!(error.is_lookup_cycle());
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let registry = DefaultComponentRegistry::new();
    registry
        .register(
            Descriptor::builder::<dyn Alpha>()
                .depends_on::<dyn Alpha>()
                .constructor(|_| Ok(Arc::new(AlphaImpl) as Arc<dyn Alpha>))
                .build(),
            None,
        )
        .unwrap();

    assert!(registry.get::<dyn Alpha>().err().unwrap().is_lookup_cycle());
}

#[test]
fn test_shared_dependency_is_not_a_cycle() {
    let registry = DefaultComponentRegistry::new();
    registry
        .register_instance::<dyn Greeter>(None, english())
        .unwrap();
    registry
        .register(
            Descriptor::builder::<dyn Alpha>()
                .depends_on::<dyn Greeter>()
                .depends_on::<dyn Beta>()
                .constructor(|_| Ok(Arc::new(AlphaImpl) as Arc<dyn Alpha>))
                .build(),
            None,
        )
        .unwrap();
    registry
        .register(
            Descriptor::builder::<dyn Beta>()
                .depends_on::<dyn Greeter>()
                .constructor(|_| Ok(Arc::new(BetaImpl) as Arc<dyn Beta>))
                .build(),
            None,
        )
        .unwrap();

    registry.get::<dyn Alpha>().unwrap();
}

#[test]
fn test_dependencies_are_injected() {
    let registry = DefaultComponentRegistry::new();
    registry
        .register_instance::<dyn Greeter>(Some("base"), english())
        .unwrap();
    registry
        .register(
            Descriptor::builder::<dyn Greeter>()
                .hint("loud")
                .depends_on_named::<dyn Greeter>("base")
                .implementation("Loud")
                .constructor(|deps: &Dependencies| {
                    let inner = deps.get_named::<dyn Greeter>("base")?;
                    Ok(Arc::new(Loud { inner }) as Arc<dyn Greeter>)
                })
                .build(),
            None,
        )
        .unwrap();

    let loud = registry.get_named::<dyn Greeter>("loud").unwrap();
    assert_eq!(loud.greet(), "HELLO");
}

#[test]
fn test_missing_dependency_is_not_found() {
    let registry = DefaultComponentRegistry::new();
    registry
        .register(
            Descriptor::builder::<dyn Alpha>()
                .depends_on::<dyn Beta>()
                .constructor(|_| Ok(Arc::new(AlphaImpl) as Arc<dyn Alpha>))
                .build(),
            None,
        )
        .unwrap();

    let error = registry.get::<dyn Alpha>().err().unwrap();
    assert!(error.is_not_found());
    assert!(error.to_string().contains("Beta"));
}

#[test]
fn test_factory_failure_is_wrapped_and_retried() {
    let registry = DefaultComponentRegistry::new();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    registry
        .register_factory::<dyn Greeter, _>(None, move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(nsc_domain::Error::internal("warming up"));
            }
            Ok(english())
        })
        .unwrap();

    let error = registry.get::<dyn Greeter>().err().unwrap();
    assert!(matches!(error, nsc_domain::Error::Instantiation { .. }));

    // A failed construction leaves the slot empty
    registry.get::<dyn Greeter>().unwrap();
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_instance_for_another_role_is_rejected() {
    let registry = DefaultComponentRegistry::new();
    let descriptor = Descriptor::for_instance(RoleHint::of::<dyn Alpha>());
    let error = registry
        .register(descriptor, Some(Component::new::<dyn Greeter>(english())))
        .unwrap_err();
    assert!(matches!(error, nsc_domain::Error::Instantiation { .. }));
    assert!(registry.is_empty());
}

#[test]
fn test_ready_instance_requires_singleton() {
    let registry = DefaultComponentRegistry::new();
    let descriptor = Descriptor::builder::<dyn Greeter>().per_lookup().build();
    let error = registry
        .register(descriptor, Some(Component::new::<dyn Greeter>(english())))
        .unwrap_err();
    assert!(matches!(error, nsc_domain::Error::Instantiation { .. }));
}

#[test]
fn test_parent_fallback_and_local_override() {
    let root: Arc<dyn ComponentRegistry> = Arc::new(DefaultComponentRegistry::new());
    root.register_instance::<dyn Greeter>(None, english())
        .unwrap();
    let child = DefaultComponentRegistry::new().with_parent(Arc::clone(&root));

    assert_eq!(child.get::<dyn Greeter>().unwrap().greet(), "hello");
    assert!(child.has_component(&RoleHint::of::<dyn Greeter>()).unwrap());
    assert!(
        !child
            .has_local_component(&RoleHint::of::<dyn Greeter>())
            .unwrap()
    );
    assert!(child.descriptor(&RoleHint::of::<dyn Greeter>()).unwrap().is_some());

    child
        .register_instance::<dyn Greeter>(None, french())
        .unwrap();
    assert_eq!(child.get::<dyn Greeter>().unwrap().greet(), "bonjour");
    assert_eq!(root.get::<dyn Greeter>().unwrap().greet(), "hello");
}

#[test]
fn test_lookup_all_keeps_registration_order() {
    let registry = DefaultComponentRegistry::new();
    registry
        .register_instance::<dyn Greeter>(Some("fr"), french())
        .unwrap();
    registry
        .register_instance::<dyn Greeter>(Some("en"), english())
        .unwrap();
    registry
        .register_instance::<dyn Alpha>(None, Arc::new(AlphaImpl))
        .unwrap();

    let greetings: Vec<String> = registry
        .get_all::<dyn Greeter>()
        .unwrap()
        .iter()
        .map(|g| g.greet())
        .collect();
    assert_eq!(greetings, vec!["bonjour", "hello"]);

    let by_hint = registry.get_map::<dyn Greeter>().unwrap();
    assert_eq!(by_hint.len(), 2);
    assert_eq!(by_hint["en"].greet(), "hello");

    let hints: Vec<String> = registry
        .descriptors(Role::of::<dyn Greeter>())
        .unwrap()
        .iter()
        .map(|d| d.role_hint().hint().to_string())
        .collect();
    assert_eq!(hints, vec!["fr", "en"]);
    assert_eq!(registry.role_hints().unwrap().len(), 3);
}

#[test]
fn test_release_runs_hook_and_drops_cached_singleton() {
    let registry = DefaultComponentRegistry::new();
    let log = EventLog::new();
    let hook_log = log.clone();
    registry
        .register(
            Descriptor::builder::<dyn Greeter>()
                .factory(move |_: &Dependencies| {
                    Ok(Component::with_shutdown::<dyn Greeter>(
                        english(),
                        Arc::new(RecordingDisposer {
                            name: "english",
                            log: hook_log.clone(),
                        }),
                    ))
                })
                .build(),
            None,
        )
        .unwrap();

    let role_hint = RoleHint::of::<dyn Greeter>();
    let first = registry.lookup(&role_hint).unwrap();
    registry.release(&first).unwrap();
    assert!(first.is_released());
    assert_eq!(log.entries(), vec!["dispose:english"]);

    // Releasing twice does not run the hook again
    registry.release(&first).unwrap();
    assert_eq!(log.entries().len(), 1);

    let second = registry.lookup(&role_hint).unwrap();
    assert!(!Component::ptr_eq(&first, &second));
    assert!(registry.has_local_component(&role_hint).unwrap());
}

#[test]
fn test_release_through_child_drops_parent_singleton() {
    let root: Arc<dyn ComponentRegistry> = Arc::new(DefaultComponentRegistry::new());
    let log = EventLog::new();
    let hook_log = log.clone();
    root.register(
        Descriptor::builder::<dyn Greeter>()
            .factory(move |_: &Dependencies| {
                Ok(Component::with_shutdown::<dyn Greeter>(
                    english(),
                    Arc::new(RecordingDisposer {
                        name: "english",
                        log: hook_log.clone(),
                    }),
                ))
            })
            .build(),
        None,
    )
    .unwrap();
    let child = DefaultComponentRegistry::new().with_parent(Arc::clone(&root));

    let role_hint = RoleHint::of::<dyn Greeter>();
    let first = child.lookup(&role_hint).unwrap();
    child.release(&first).unwrap();
    assert!(first.is_released());
    assert_eq!(log.entries(), vec!["dispose:english"]);

    let second = child.lookup(&role_hint).unwrap();
    assert!(!Component::ptr_eq(&first, &second));
    assert!(!second.is_released());
    assert!(Component::ptr_eq(&second, &root.lookup(&role_hint).unwrap()));
}

#[test]
fn test_replacement_releases_previous_singleton() {
    let registry = DefaultComponentRegistry::new();
    let log = EventLog::new();
    let component = Component::with_shutdown::<dyn Greeter>(
        english(),
        Arc::new(RecordingDisposer {
            name: "old",
            log: log.clone(),
        }),
    );
    registry
        .register(
            Descriptor::for_instance(RoleHint::of::<dyn Greeter>()),
            Some(component.clone()),
        )
        .unwrap();

    // Re-registering the same instance keeps it alive
    registry
        .register(
            Descriptor::for_instance(RoleHint::of::<dyn Greeter>()),
            Some(component.clone()),
        )
        .unwrap();
    assert!(log.entries().is_empty());

    registry
        .register_instance::<dyn Greeter>(None, french())
        .unwrap();
    assert_eq!(log.entries(), vec!["dispose:old"]);
    assert_eq!(registry.get::<dyn Greeter>().unwrap().greet(), "bonjour");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_dispose_releases_in_reverse_registration_order() {
    let registry = DefaultComponentRegistry::new();
    let log = EventLog::new();
    for name in ["first", "second", "third"] {
        registry
            .register(
                Descriptor::for_instance(RoleHint::named::<dyn Greeter>(name)),
                Some(Component::with_shutdown::<dyn Greeter>(
                    english(),
                    Arc::new(RecordingDisposer {
                        name,
                        log: log.clone(),
                    }),
                )),
            )
            .unwrap();
    }

    registry.dispose().unwrap();
    assert_eq!(
        log.entries(),
        vec!["dispose:third", "dispose:second", "dispose:first"]
    );
    assert!(registry.is_empty());
}

#[test]
fn test_event_sink_sees_register_and_unregister() {
    let sink = Arc::new(RecordingSink::default());
    let registry = DefaultComponentRegistry::new().with_event_sink(Some(sink.clone()));

    registry
        .register_instance::<dyn Greeter>(Some("en"), english())
        .unwrap();
    registry
        .unregister(&RoleHint::named::<dyn Greeter>("en"))
        .unwrap();
    registry
        .unregister(&RoleHint::named::<dyn Greeter>("missing"))
        .unwrap();

    assert_eq!(sink.log.entries(), vec!["register:en", "unregister:en"]);

    registry.set_event_sink(None).unwrap();
    registry
        .register_instance::<dyn Greeter>(Some("fr"), french())
        .unwrap();
    assert_eq!(sink.log.entries().len(), 2);
}
