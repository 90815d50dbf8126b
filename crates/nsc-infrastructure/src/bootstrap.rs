//! Runtime composition root
//!
//! Wires the root registry, the namespace directory, the per-thread
//! execution stack, the lifecycle manager and the namespace proxy from an
//! [`AppConfig`].
//!
//! ```text
//! NamespaceScopedProxy ──key──▶ FramePropertyKeySource ──▶ ThreadExecution
//!        │
//!        ▼
//! NamespaceDirectory ──▶ namespace registries ──parent──▶ root registry
//! ```

use crate::config::AppConfig;
use crate::config::loader::validate_app_config;
use crate::execution::{DefaultExecutionLifecycleManager, ThreadExecution};
use crate::namespace::{
    DefaultRegistryFactory, FramePropertyKeySource, NamespaceDirectory, NamespaceScopedProxy,
};
use crate::registry::{DefaultComponentRegistry, TracingEventSink};
use nsc_domain::error::Result;
use nsc_domain::ports::{
    ComponentRegistry, ComponentRegistryExt, Execution, ExecutionLifecycleManager,
    NamespaceKeySource, RegistryEventSink,
};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Wired runtime services
#[derive(Clone)]
pub struct RuntimeContext {
    config: Arc<AppConfig>,
    root: Arc<DefaultComponentRegistry>,
    directory: Arc<NamespaceDirectory>,
    execution: Arc<ThreadExecution>,
    key_source: Arc<FramePropertyKeySource>,
    lifecycle: Arc<DefaultExecutionLifecycleManager>,
    proxy: Arc<NamespaceScopedProxy>,
}

impl RuntimeContext {
    /// Configuration the runtime was built from
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Root registry, shared by every namespace
    pub fn root(&self) -> Arc<dyn ComponentRegistry> {
        Arc::clone(&self.root) as Arc<dyn ComponentRegistry>
    }

    pub fn directory(&self) -> Arc<NamespaceDirectory> {
        Arc::clone(&self.directory)
    }

    pub fn execution(&self) -> Arc<dyn Execution> {
        Arc::clone(&self.execution) as Arc<dyn Execution>
    }

    pub fn key_source(&self) -> Arc<dyn NamespaceKeySource> {
        Arc::clone(&self.key_source) as Arc<dyn NamespaceKeySource>
    }

    pub fn lifecycle(&self) -> Arc<DefaultExecutionLifecycleManager> {
        Arc::clone(&self.lifecycle)
    }

    /// Registry routed to the current namespace
    pub fn registry(&self) -> Arc<dyn ComponentRegistry> {
        Arc::clone(&self.proxy) as Arc<dyn ComponentRegistry>
    }

    /// Dispose every namespace registry, then the root registry
    pub fn shutdown(&self) -> Result<()> {
        for key in self.directory.keys() {
            self.directory.dispose(&key)?;
        }
        self.root.dispose()?;
        info!("Runtime shut down");
        Ok(())
    }
}

impl fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("root", &self.root)
            .field("directory", &self.directory)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

/// Initialize the runtime with no host components
pub fn init_runtime(config: AppConfig) -> Result<RuntimeContext> {
    init_runtime_with(config, |_| Ok(()))
}

/// Initialize the runtime, letting the host populate the root registry
///
/// `configure` runs before the lifecycle manager collects the registered
/// `dyn ExecutionInitializer`s, so initializers registered there take part.
pub fn init_runtime_with<F>(config: AppConfig, configure: F) -> Result<RuntimeContext>
where
    F: FnOnce(&dyn ComponentRegistry) -> Result<()>,
{
    validate_app_config(&config)?;
    info!("Initializing namespaced component runtime");

    let event_sink: Option<Arc<dyn RegistryEventSink>> = if config.registry.trace_events {
        Some(Arc::new(TracingEventSink))
    } else {
        None
    };

    let root = Arc::new(DefaultComponentRegistry::new().with_event_sink(event_sink.clone()));
    let root_dyn: Arc<dyn ComponentRegistry> = root.clone();

    let directory = Arc::new(
        NamespaceDirectory::new(Arc::clone(&root_dyn))
            .with_separator(config.namespace.separator)
            .with_default_factory(Arc::new(
                DefaultRegistryFactory::new().with_event_sink(event_sink),
            )),
    );

    let execution = Arc::new(ThreadExecution::new());
    let key_source = Arc::new(FramePropertyKeySource::with_property(
        execution.clone(),
        config.namespace.key_property.clone(),
    ));

    // Shared collaborators, available as dependencies of host components
    root.register_instance::<dyn Execution>(None, execution.clone())?;
    root.register_instance::<dyn NamespaceKeySource>(None, key_source.clone())?;

    configure(root_dyn.as_ref())?;

    let lifecycle = Arc::new(DefaultExecutionLifecycleManager::from_registry(
        root_dyn.as_ref(),
        execution.clone(),
    )?);
    root.register_instance::<dyn ExecutionLifecycleManager>(None, lifecycle.clone())?;

    let proxy = Arc::new(NamespaceScopedProxy::new(
        Arc::clone(&directory),
        key_source.clone(),
    ));
    proxy.set_parent(Some(root_dyn));

    info!(
        components = root.len(),
        initializers = lifecycle.initializers().len(),
        key_property = %config.namespace.key_property,
        "Runtime initialized"
    );

    Ok(RuntimeContext {
        config: Arc::new(config),
        root,
        directory,
        execution,
        key_source,
        lifecycle,
        proxy,
    })
}
