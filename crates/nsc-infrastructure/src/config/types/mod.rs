//! Configuration types module

pub mod app;
pub mod logging;
pub mod namespace;
pub mod registry;

// Re-export main types
pub use app::*;
