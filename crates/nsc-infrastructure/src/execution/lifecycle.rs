//! Execution lifecycle management
//!
//! Pushes, clones and initializes execution frames, running the registered
//! [`ExecutionInitializer`]s in priority order.
//!
//! ## Usage
//!
//! ```ignore
//! let manager = DefaultExecutionLifecycleManager::from_registry(&*root, execution)?;
//!
//! let frame = ExecutionFrame::new();
//! frame.declare("namespace").initial("wiki:acme").inherited().commit()?;
//! {
//!     let _scope = manager.enter(&frame)?;
//!     // frame is current here
//! }
//! // and popped here, even on early return
//! ```

use nsc_domain::error::Result;
use nsc_domain::execution::ExecutionFrame;
use nsc_domain::ports::{
    ComponentRegistry, ComponentRegistryExt, Execution, ExecutionInitializer,
    ExecutionLifecycleManager,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Lifecycle manager over an [`Execution`] and a fixed set of initializers
pub struct DefaultExecutionLifecycleManager {
    execution: Arc<dyn Execution>,
    initializers: Vec<Arc<dyn ExecutionInitializer>>,
}

impl DefaultExecutionLifecycleManager {
    /// Manager running `initializers`, sorted by priority (stable)
    pub fn new(
        execution: Arc<dyn Execution>,
        mut initializers: Vec<Arc<dyn ExecutionInitializer>>,
    ) -> Self {
        initializers.sort_by_key(|initializer| initializer.priority());
        Self {
            execution,
            initializers,
        }
    }

    /// Manager running every `dyn ExecutionInitializer` registered in `registry`
    ///
    /// Ties in priority keep registration order.
    pub fn from_registry(
        registry: &dyn ComponentRegistry,
        execution: Arc<dyn Execution>,
    ) -> Result<Self> {
        let initializers = registry.get_all::<dyn ExecutionInitializer>()?;
        debug!(
            initializers = initializers.len(),
            "Execution lifecycle manager created from registry"
        );
        Ok(Self::new(execution, initializers))
    }

    /// Initializers in execution order
    pub fn initializers(&self) -> &[Arc<dyn ExecutionInitializer>] {
        &self.initializers
    }

    /// The execution stack this manager drives
    pub fn execution(&self) -> &Arc<dyn Execution> {
        &self.execution
    }

    fn is_current(&self, frame: &ExecutionFrame) -> bool {
        self.execution
            .current()
            .is_some_and(|current| ExecutionFrame::ptr_eq(&current, frame))
    }

    /// Run every initializer against `frame`, stopping at the first failure
    pub fn run_initializers(&self, frame: &ExecutionFrame) -> Result<()> {
        for initializer in &self.initializers {
            trace!(initializer = initializer.name(), "Running execution initializer");
            if let Err(e) = initializer.initialize(frame) {
                warn!(initializer = initializer.name(), error = %e, "Execution initializer failed");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Initialize `frame` and keep it current until the returned scope drops
    ///
    /// Unlike [`ExecutionLifecycleManager::initialize`], a failed
    /// initialization pops the frame before returning the error. A rejected
    /// push leaves the stack as it was.
    pub fn enter(&self, frame: &ExecutionFrame) -> Result<ExecutionScope> {
        if let Err(e) = self.initialize(frame) {
            if self.is_current(frame) && self.execution.pop().is_err() {
                warn!("Execution stack was empty after failed initialization");
            }
            return Err(e);
        }
        Ok(ExecutionScope {
            execution: Arc::clone(&self.execution),
            frame: frame.clone(),
        })
    }
}

impl ExecutionLifecycleManager for DefaultExecutionLifecycleManager {
    fn initialize(&self, frame: &ExecutionFrame) -> Result<()> {
        self.execution.push(frame.clone(), true)?;
        self.run_initializers(frame)
    }

    fn clone_frame(&self, source: &ExecutionFrame) -> Result<ExecutionFrame> {
        let frame = ExecutionFrame::new();
        frame.inherit_from(source)?;

        self.execution.push(frame.clone(), false)?;
        let initialized = self.run_initializers(&frame);
        let popped = self.execution.pop();
        initialized?;
        popped?;

        trace!(properties = frame.len(), "Execution frame cloned");
        Ok(frame)
    }

    fn push_context(&self, frame: &ExecutionFrame, inherit: bool) -> Result<()> {
        self.execution.push(frame.clone(), inherit)?;
        if !inherit {
            self.run_initializers(frame)?;
        }
        Ok(())
    }

    fn pop_context(&self) -> Result<ExecutionFrame> {
        self.execution.pop()
    }
}

impl fmt::Debug for DefaultExecutionLifecycleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.initializers.iter().map(|i| i.name()).collect();
        f.debug_struct("DefaultExecutionLifecycleManager")
            .field("initializers", &names)
            .finish_non_exhaustive()
    }
}

/// Guard that pops its frame when dropped
#[must_use = "the frame is popped as soon as the scope is dropped"]
pub struct ExecutionScope {
    execution: Arc<dyn Execution>,
    frame: ExecutionFrame,
}

impl ExecutionScope {
    /// The frame this scope keeps current
    pub fn frame(&self) -> &ExecutionFrame {
        &self.frame
    }
}

impl Drop for ExecutionScope {
    fn drop(&mut self) {
        let on_top = self
            .execution
            .current()
            .is_some_and(|current| ExecutionFrame::ptr_eq(&current, &self.frame));
        if !on_top {
            warn!("Execution scope frame is not current; leaving the stack untouched");
            return;
        }
        if let Err(e) = self.execution.pop() {
            warn!(error = %e, "Execution scope could not pop its frame");
        }
    }
}

impl fmt::Debug for ExecutionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionScope")
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}
