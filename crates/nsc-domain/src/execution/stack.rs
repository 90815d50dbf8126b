//! Execution stack
//!
//! Ordered frames of one thread; the last frame is the current one. Pushing
//! with inheritance copies the inherited properties of the current top into
//! the new frame before it becomes current.

use crate::error::{Error, Result};
use crate::execution::frame::ExecutionFrame;

/// Stack of execution frames
#[derive(Debug, Default)]
pub struct ExecutionStack {
    frames: Vec<ExecutionFrame>,
}

impl ExecutionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `frame`, inheriting from the current top first when `inherit` is set
    ///
    /// A failed inheritance leaves the stack unchanged.
    pub fn push(&mut self, frame: ExecutionFrame, inherit: bool) -> Result<()> {
        if inherit {
            if let Some(top) = self.frames.last() {
                frame.inherit_from(top)?;
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Remove and return the top frame
    pub fn pop(&mut self) -> Result<ExecutionFrame> {
        self.frames.pop().ok_or(Error::EmptyStack)
    }

    /// Current frame
    pub fn current(&self) -> Option<&ExecutionFrame> {
        self.frames.last()
    }

    /// Replace the top frame, inheriting from the frame being replaced
    ///
    /// Behaves as [`ExecutionStack::push`] when the stack is empty.
    pub fn replace_top(&mut self, frame: ExecutionFrame, inherit: bool) -> Result<()> {
        if self.frames.is_empty() {
            return self.push(frame, inherit);
        }
        let top = self.frames.len() - 1;
        if inherit {
            frame.inherit_from(&self.frames[top])?;
        }
        self.frames[top] = frame;
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames from bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &ExecutionFrame> {
        self.frames.iter()
    }
}
