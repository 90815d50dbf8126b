//! Execution context model
//!
//! Request-scoped state carried across nested invocations on one thread.
//!
//! | Type | Role |
//! |------|------|
//! | [`PropertyValue`] | opaque, optionally copyable value |
//! | [`Property`] | keyed value with final / inherited / non-null / typed flags |
//! | [`ExecutionFrame`] | ordered property bag, one per stack level |
//! | [`ExecutionStack`] | frames of one thread, top is current |

pub mod frame;
pub mod property;
pub mod stack;
pub mod value;

pub use frame::{ExecutionFrame, PropertyDeclaration};
pub use property::{Property, PropertyInfo};
pub use stack::ExecutionStack;
pub use value::{PropertyValue, ValueType};
