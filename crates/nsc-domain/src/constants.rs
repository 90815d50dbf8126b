//! Domain constants

/// Hint used when a role is registered or looked up without an explicit hint
pub const DEFAULT_HINT: &str = "default";

/// Separator between the namespace type and its value (`wiki:acme`)
pub const DEFAULT_NAMESPACE_SEPARATOR: char = ':';

/// Escape character for the namespace separator and for itself
pub const NAMESPACE_ESCAPE: char = '\\';

/// Priority given to execution initializers that do not declare one.
///
/// Lower priorities run first.
pub const DEFAULT_INITIALIZER_PRIORITY: i32 = 1000;
