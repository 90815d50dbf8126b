//! Built-in registry event sinks

use nsc_domain::ports::RegistryEventSink;
use nsc_domain::value_objects::{Descriptor, RoleHint};
use std::sync::Arc;
use tracing::info;

/// Emits one structured `tracing` event per notification
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl RegistryEventSink for TracingEventSink {
    fn on_register(&self, descriptor: &Descriptor) {
        info!(
            role = %descriptor.role_hint().role(),
            hint = descriptor.role_hint().hint(),
            strategy = ?descriptor.strategy(),
            implementation = descriptor.implementation().unwrap_or("-"),
            "Component registered"
        );
    }

    fn on_unregister(&self, role_hint: &RoleHint) {
        info!(
            role = %role_hint.role(),
            hint = role_hint.hint(),
            "Component unregistered"
        );
    }
}

/// Discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl RegistryEventSink for NullEventSink {
    fn on_register(&self, _descriptor: &Descriptor) {}

    fn on_unregister(&self, _role_hint: &RoleHint) {}
}

/// Delivers every notification to several sinks, in order
#[derive(Default, Clone)]
pub struct FanoutEventSink {
    sinks: Vec<Arc<dyn RegistryEventSink>>,
}

impl FanoutEventSink {
    pub fn new(sinks: Vec<Arc<dyn RegistryEventSink>>) -> Self {
        Self { sinks }
    }

    /// Add another sink
    pub fn with(mut self, sink: Arc<dyn RegistryEventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl RegistryEventSink for FanoutEventSink {
    fn on_register(&self, descriptor: &Descriptor) {
        for sink in &self.sinks {
            sink.on_register(descriptor);
        }
    }

    fn on_unregister(&self, role_hint: &RoleHint) {
        for sink in &self.sinks {
            sink.on_unregister(role_hint);
        }
    }
}
