//! Domain entities

/// Constructed component handles
pub mod component;

pub use component::Component;
