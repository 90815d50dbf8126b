//! Unit tests for domain error types

use nsc_domain::Error;

#[test]
fn test_not_found_error() {
    let error = Error::not_found("dyn Cache[default]");
    match &error {
        Error::NotFound { role_hint } => assert_eq!(role_hint, "dyn Cache[default]"),
        _ => panic!("Expected NotFound error"),
    }
    assert!(error.is_not_found());
    assert!(error.to_string().contains("dyn Cache[default]"));
}

#[test]
fn test_constraint_violation_error() {
    let error = Error::constraint_violation("namespace", "final property already holds a value");
    match &error {
        Error::ConstraintViolation { key, reason } => {
            assert_eq!(key, "namespace");
            assert!(reason.contains("final"));
        }
        _ => panic!("Expected ConstraintViolation error"),
    }
    assert!(error.is_constraint_violation());
    assert!(!error.is_not_found());
}

#[test]
fn test_not_copyable_error() {
    let error = Error::not_copyable("session", "Session");
    assert!(error.is_not_copyable());
    assert_eq!(
        error.to_string(),
        "Value of property [session] (Session) cannot be copied"
    );
}

#[test]
fn test_empty_stack_and_proxy_errors() {
    assert!(Error::EmptyStack.is_empty_stack());
    assert!(Error::misconfigured_proxy("no parent").is_misconfigured_proxy());
    assert!(Error::lookup_cycle("A -> B -> A").is_lookup_cycle());
}

#[test]
fn test_instantiation_error_keeps_source() {
    let io = std::io::Error::other("disk gone");
    let error = Error::instantiation_with_source("dyn Store[default]", "factory failed", io);
    let source = std::error::Error::source(&error).unwrap();
    assert_eq!(source.to_string(), "disk gone");
}

#[test]
fn test_io_error_conversion() {
    let error: Error = std::io::Error::other("boom").into();
    assert!(matches!(error, Error::Io { .. }));
}
