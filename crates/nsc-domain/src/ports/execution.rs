//! Execution Context Ports
//!
//! ## Architecture
//!
//! ```text
//! ExecutionLifecycleManager ── runs ──▶ ExecutionInitializer (ordered)
//!            │
//!            ▼
//!       Execution (per-thread stack of ExecutionFrame)
//! ```
//!
//! Frames are thread-confined, so none of these methods move frames between
//! threads. The services themselves are `Send + Sync` and can be shared.

use crate::constants::DEFAULT_INITIALIZER_PRIORITY;
use crate::error::Result;
use crate::execution::ExecutionFrame;

/// Access to the current thread's execution stack
pub trait Execution: Send + Sync {
    /// Top frame, if any
    fn current(&self) -> Option<ExecutionFrame>;

    /// Push `frame`, first inheriting from the current top when `inherit` is set
    fn push(&self, frame: ExecutionFrame, inherit: bool) -> Result<()>;

    /// Remove and return the top frame
    fn pop(&self) -> Result<ExecutionFrame>;

    /// Replace the top frame (or push when the stack is empty)
    fn replace_top(&self, frame: ExecutionFrame, inherit: bool) -> Result<()>;

    /// Number of frames on the stack
    fn depth(&self) -> usize;
}

/// Step that populates or validates a frame when it is created or cloned
pub trait ExecutionInitializer: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Ordering key; lower runs first, ties keep declaration order
    fn priority(&self) -> i32 {
        DEFAULT_INITIALIZER_PRIORITY
    }

    /// Populate `frame`, which is the current frame while this runs
    fn initialize(&self, frame: &ExecutionFrame) -> Result<()>;
}

/// Frame creation, cloning and initializer orchestration
pub trait ExecutionLifecycleManager: Send + Sync {
    /// Push `frame` inheriting from the current frame, then run every initializer
    ///
    /// On initializer failure the frame stays pushed and the caller must still
    /// call [`ExecutionLifecycleManager::pop_context`]. When the push itself
    /// is rejected nothing is pushed, so check that `frame` is the current
    /// frame before popping.
    fn initialize(&self, frame: &ExecutionFrame) -> Result<()>;

    /// Build a freshly initialized frame that inherits from `source`
    fn clone_frame(&self, source: &ExecutionFrame) -> Result<ExecutionFrame>;

    /// Push `frame`; a non-inheriting push also runs the initializers
    fn push_context(&self, frame: &ExecutionFrame, inherit: bool) -> Result<()>;

    /// Pop the current frame
    fn pop_context(&self) -> Result<ExecutionFrame>;
}
