//! Execution context services
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ThreadExecution`] | per-thread execution stack |
//! | [`DefaultExecutionLifecycleManager`] | frame initialization and cloning |
//! | [`ExecutionScope`] | pops its frame on drop |

pub mod lifecycle;
pub mod thread;

pub use lifecycle::{DefaultExecutionLifecycleManager, ExecutionScope};
pub use thread::ThreadExecution;
