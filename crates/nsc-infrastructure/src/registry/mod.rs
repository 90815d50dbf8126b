//! Component registries
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DefaultComponentRegistry`] | DashMap-backed registry with parent fallback |
//! | [`TracingEventSink`] | Structured log line per register/unregister |
//! | [`NullEventSink`] | Discards notifications |
//! | [`FanoutEventSink`] | Forwards to several sinks |

pub mod component_registry;
pub mod events;

pub use component_registry::DefaultComponentRegistry;
pub use events::{FanoutEventSink, NullEventSink, TracingEventSink};
