//! Thread execution stack and lifecycle manager

use crate::test_utils::*;
use nsc_domain::execution::{ExecutionFrame, PropertyValue};
use nsc_domain::ports::{
    ComponentRegistryExt, Execution, ExecutionInitializer, ExecutionLifecycleManager,
};
use nsc_infrastructure::execution::{DefaultExecutionLifecycleManager, ThreadExecution};
use nsc_infrastructure::registry::DefaultComponentRegistry;
use std::sync::Arc;
use std::thread;

struct Connection;

fn manager(initializers: Vec<Arc<dyn ExecutionInitializer>>) -> DefaultExecutionLifecycleManager {
    DefaultExecutionLifecycleManager::new(Arc::new(ThreadExecution::new()), initializers)
}

fn tenant_frame(namespace: &str) -> ExecutionFrame {
    let frame = ExecutionFrame::new();
    frame
        .declare("namespace")
        .initial(namespace)
        .inherited()
        .make_final()
        .commit()
        .unwrap();
    frame
}

#[test]
fn test_push_inherit_flag_controls_copy() {
    let execution = ThreadExecution::new();
    let parent = ExecutionFrame::new();
    parent
        .declare("user")
        .initial("alice")
        .inherited()
        .commit()
        .unwrap();
    parent.set("scratch", "local").unwrap();
    execution.push(parent, false).unwrap();

    let inheriting = ExecutionFrame::new();
    execution.push(inheriting.clone(), true).unwrap();
    assert_eq!(inheriting.get::<String>("user").as_deref(), Some("alice"));
    assert!(!inheriting.contains("scratch"));
    execution.pop().unwrap();

    let isolated = ExecutionFrame::new();
    execution.push(isolated.clone(), false).unwrap();
    assert!(!isolated.contains("user"));

    execution.clear();
    assert_eq!(execution.depth(), 0);
}

#[test]
fn test_pop_empty_stack_fails() {
    let execution = ThreadExecution::new();
    assert!(execution.current().is_none());
    assert!(execution.pop().unwrap_err().is_empty_stack());
}

#[test]
fn test_stacks_are_per_thread() {
    let execution = Arc::new(ThreadExecution::new());
    execution.push(tenant_frame("wiki:main"), false).unwrap();

    let other = Arc::clone(&execution);
    let depth = thread::spawn(move || other.depth()).join().unwrap();
    assert_eq!(depth, 0);
    assert_eq!(execution.depth(), 1);
    execution.clear();
}

#[test]
fn test_conflicting_final_value_is_rejected() {
    let execution = ThreadExecution::new();
    let current = tenant_frame("wiki:acme");
    execution.push(current.clone(), false).unwrap();

    let intruder = tenant_frame("wiki:other");
    let error = execution.push(intruder, true).unwrap_err();
    assert!(error.is_constraint_violation());
    assert_eq!(execution.depth(), 1);

    // Writing a final property twice is rejected too
    assert!(
        current
            .set("namespace", "wiki:other")
            .unwrap_err()
            .is_constraint_violation()
    );
    execution.clear();
}

#[test]
fn test_cloned_frame_pushes_on_top_of_its_source() {
    let manager = manager(Vec::new());
    let execution = manager.execution().clone();
    let current = tenant_frame("wiki:acme");
    execution.push(current.clone(), false).unwrap();

    let clone = manager.clone_frame(&current).unwrap();
    assert_eq!(execution.depth(), 1);
    assert_eq!(clone.get::<String>("namespace").as_deref(), Some("wiki:acme"));

    execution.push(clone.clone(), true).unwrap();
    assert_eq!(execution.depth(), 2);
    assert!(ExecutionFrame::ptr_eq(&execution.current().unwrap(), &clone));

    execution.pop().unwrap();
    execution.pop().unwrap();
}

#[test]
fn test_cloned_property_knows_its_source() {
    let manager = manager(Vec::new());
    let source = tenant_frame("wiki:acme");
    let clone = manager.clone_frame(&source).unwrap();
    let independent = tenant_frame("wiki:acme");

    let original = source.property("namespace").unwrap();
    assert!(clone.property("namespace").unwrap().is_cloned_from(&original));
    assert!(
        !independent
            .property("namespace")
            .unwrap()
            .is_cloned_from(&original)
    );
    assert!(clone.property_info("namespace").unwrap().cloned);
}

#[test]
fn test_clone_of_non_copyable_value_fails() {
    let manager = manager(Vec::new());
    let source = ExecutionFrame::new();
    source
        .declare("connection")
        .value(Some(PropertyValue::new(Connection)))
        .inherited()
        .clone_value()
        .commit()
        .unwrap();

    let error = manager.clone_frame(&source).unwrap_err();
    assert!(error.is_not_copyable());
    assert_eq!(manager.execution().depth(), 0);
}

#[test]
fn test_initializers_run_in_priority_order() {
    let log = EventLog::new();
    let manager = manager(vec![
        Arc::new(RecordingInitializer::new("late", 2000, &log)),
        Arc::new(RecordingInitializer::new("first", 10, &log).setting("locale", "fr")),
        Arc::new(RecordingInitializer::new("tie-a", 1000, &log)),
        Arc::new(RecordingInitializer::new("tie-b", 1000, &log)),
    ]);

    let frame = ExecutionFrame::new();
    manager.initialize(&frame).unwrap();

    assert_eq!(log.entries(), vec!["first", "tie-a", "tie-b", "late"]);
    assert_eq!(frame.get::<String>("locale").as_deref(), Some("fr"));
    assert!(ExecutionFrame::ptr_eq(
        &manager.execution().current().unwrap(),
        &frame
    ));
    manager.pop_context().unwrap();
}

#[test]
fn test_initialize_inherits_from_current_frame() {
    let manager = manager(Vec::new());
    manager.initialize(&tenant_frame("wiki:acme")).unwrap();

    let nested = ExecutionFrame::new();
    manager.initialize(&nested).unwrap();
    assert_eq!(nested.get::<String>("namespace").as_deref(), Some("wiki:acme"));

    manager.pop_context().unwrap();
    manager.pop_context().unwrap();
    assert!(manager.pop_context().unwrap_err().is_empty_stack());
}

#[test]
fn test_failed_initialize_leaves_frame_pushed() {
    let log = EventLog::new();
    let manager = manager(vec![
        Arc::new(RecordingInitializer::new("broken", 1, &log).failing()),
        Arc::new(RecordingInitializer::new("never", 2, &log)),
    ]);

    let frame = ExecutionFrame::new();
    assert!(manager.initialize(&frame).is_err());
    assert_eq!(log.entries(), vec!["broken"]);
    assert_eq!(manager.execution().depth(), 1);
    manager.pop_context().unwrap();
}

#[test]
fn test_push_context_runs_initializers_only_without_inheritance() {
    let log = EventLog::new();
    let manager = manager(vec![Arc::new(RecordingInitializer::new(
        "init", 1, &log,
    ))]);

    manager.push_context(&ExecutionFrame::new(), true).unwrap();
    assert!(log.entries().is_empty());

    manager.push_context(&ExecutionFrame::new(), false).unwrap();
    assert_eq!(log.entries(), vec!["init"]);

    manager.pop_context().unwrap();
    manager.pop_context().unwrap();
}

#[test]
fn test_clone_frame_runs_initializers_without_leaving_it_pushed() {
    let log = EventLog::new();
    let manager = manager(vec![Arc::new(
        RecordingInitializer::new("stamp", 1, &log).setting("request", "cloned"),
    )]);

    let clone = manager.clone_frame(&tenant_frame("wiki:acme")).unwrap();
    assert_eq!(log.entries(), vec!["stamp"]);
    assert_eq!(clone.get::<String>("request").as_deref(), Some("cloned"));
    assert_eq!(manager.execution().depth(), 0);
}

#[test]
fn test_scope_pops_on_drop() {
    let manager = manager(Vec::new());
    let frame = tenant_frame("wiki:acme");
    {
        let scope = manager.enter(&frame).unwrap();
        assert!(ExecutionFrame::ptr_eq(scope.frame(), &frame));
        assert_eq!(manager.execution().depth(), 1);
    }
    assert_eq!(manager.execution().depth(), 0);
}

#[test]
fn test_failed_enter_pops_frame() {
    let log = EventLog::new();
    let manager = manager(vec![Arc::new(
        RecordingInitializer::new("broken", 1, &log).failing(),
    )]);

    assert!(manager.enter(&ExecutionFrame::new()).is_err());
    assert_eq!(manager.execution().depth(), 0);
}

#[test]
fn test_rejected_enter_keeps_current_frame() {
    let manager = manager(Vec::new());
    let current = tenant_frame("wiki:acme");
    manager.initialize(&current).unwrap();

    let error = manager.enter(&tenant_frame("wiki:other")).unwrap_err();
    assert!(error.is_constraint_violation());
    assert_eq!(manager.execution().depth(), 1);
    let top = manager.execution().current().unwrap();
    assert!(ExecutionFrame::ptr_eq(&top, &current));

    manager.pop_context().unwrap();
}

#[test]
fn test_scope_leaves_foreign_top_frame_alone() {
    let manager = manager(Vec::new());
    let frame = tenant_frame("wiki:acme");
    let scope = manager.enter(&frame).unwrap();

    let nested = ExecutionFrame::new();
    manager.push_context(&nested, true).unwrap();
    drop(scope);

    assert_eq!(manager.execution().depth(), 2);
    let top = manager.execution().pop().unwrap();
    assert!(ExecutionFrame::ptr_eq(&top, &nested));
    let below = manager.execution().pop().unwrap();
    assert!(ExecutionFrame::ptr_eq(&below, &frame));
}

#[test]
fn test_manager_collects_initializers_from_registry() {
    let log = EventLog::new();
    let registry = DefaultComponentRegistry::new();
    registry
        .register_instance::<dyn ExecutionInitializer>(
            Some("b"),
            Arc::new(RecordingInitializer::new("b", 5, &log)),
        )
        .unwrap();
    registry
        .register_instance::<dyn ExecutionInitializer>(
            Some("a"),
            Arc::new(RecordingInitializer::new("a", 1, &log)),
        )
        .unwrap();

    let manager =
        DefaultExecutionLifecycleManager::from_registry(&registry, Arc::new(ThreadExecution::new()))
            .unwrap();
    let names: Vec<&str> = manager.initializers().iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["a", "b"]);
}
