//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `nsc_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "nsc.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "nsc";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "NSC";

/// Separator between nested keys in environment variables (`NSC_LOGGING__LEVEL`)
pub const CONFIG_ENV_NESTING_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable holding an `EnvFilter` directive
pub const LOG_FILTER_ENV: &str = "NSC_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log file name stem when the configured path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "nsc";

/// Maximum number of daily log files kept
pub const LOG_MAX_FILES: usize = 5;

// ============================================================================
// NAMESPACE CONSTANTS
// ============================================================================

/// Frame property holding the current namespace key
pub const DEFAULT_NAMESPACE_KEY_PROPERTY: &str = "namespace";
