//! Unit tests for Component handles

use nsc_domain::{Component, Disposable, Role};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[derive(Default)]
struct CountingHook {
    calls: AtomicUsize,
}

impl Disposable for CountingHook {
    fn dispose(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_component_downcast_to_trait_object() {
    let greeter: Arc<dyn Greeter> = Arc::new(English);
    let component = Component::new::<dyn Greeter>(greeter);

    assert_eq!(component.role(), Role::of::<dyn Greeter>());
    let resolved = component.downcast::<dyn Greeter>().unwrap();
    assert_eq!(resolved.greet(), "hello");
    assert!(component.downcast::<English>().is_none());
}

#[test]
fn test_component_concrete_role() {
    let component = Component::new(Arc::new(42_u32));
    assert_eq!(*component.downcast::<u32>().unwrap(), 42);
    assert!(!component.has_shutdown_hook());
}

#[test]
fn test_release_runs_hook_once() {
    let hook = Arc::new(CountingHook::default());
    let component = Component::with_shutdown(Arc::new("value".to_string()), hook.clone());

    assert!(component.has_shutdown_hook());
    assert!(!component.is_released());
    assert!(component.release());
    assert!(!component.release());
    assert!(component.clone().is_released());
    assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_ptr_eq() {
    let component = Component::new(Arc::new(1_u8));
    let same = component.clone();
    let other = Component::new(Arc::new(1_u8));
    assert!(Component::ptr_eq(&component, &same));
    assert!(!Component::ptr_eq(&component, &other));
}
