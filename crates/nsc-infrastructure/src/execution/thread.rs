//! Thread-confined execution stacks
//!
//! Every OS thread owns one [`ExecutionStack`] in a `thread_local!` slot.
//! [`ThreadExecution`] is a stateless handle to "the calling thread's stack",
//! so it can be shared freely while the frames themselves never cross
//! threads.

use nsc_domain::error::Result;
use nsc_domain::execution::{ExecutionFrame, ExecutionStack};
use nsc_domain::ports::Execution;
use std::cell::RefCell;
use tracing::trace;

thread_local! {
    static STACK: RefCell<ExecutionStack> = RefCell::new(ExecutionStack::new());
}

fn with_stack<T>(f: impl FnOnce(&mut ExecutionStack) -> T) -> T {
    STACK.with(|stack| f(&mut stack.borrow_mut()))
}

/// Execution port backed by the calling thread's stack
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadExecution;

impl ThreadExecution {
    pub fn new() -> Self {
        Self
    }

    /// Drop every frame of the calling thread
    ///
    /// For pooled threads that are handed from one unit of work to the next.
    pub fn clear(&self) {
        let dropped = with_stack(|stack| {
            let mut dropped = 0;
            while stack.pop().is_ok() {
                dropped += 1;
            }
            dropped
        });
        trace!(dropped, "Execution stack cleared");
    }
}

impl Execution for ThreadExecution {
    fn current(&self) -> Option<ExecutionFrame> {
        with_stack(|stack| stack.current().cloned())
    }

    fn push(&self, frame: ExecutionFrame, inherit: bool) -> Result<()> {
        with_stack(|stack| stack.push(frame, inherit))?;
        trace!(inherit, "Execution frame pushed");
        Ok(())
    }

    fn pop(&self) -> Result<ExecutionFrame> {
        let frame = with_stack(ExecutionStack::pop)?;
        trace!("Execution frame popped");
        Ok(frame)
    }

    fn replace_top(&self, frame: ExecutionFrame, inherit: bool) -> Result<()> {
        with_stack(|stack| stack.replace_top(frame, inherit))
    }

    fn depth(&self) -> usize {
        with_stack(|stack| stack.depth())
    }
}
