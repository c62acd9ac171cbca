//! Default constants for engine configuration.

/// Optimization level used when the configured one is out of range.
pub const DEFAULT_OPTIMIZATION_LEVEL: i32 = 9;

/// Optimization level selecting interpreted mode.
pub const INTERPRETED_OPTIMIZATION_LEVEL: i32 = -1;

/// Language version code for ES2015 (the level scripts are compiled at).
pub const DEFAULT_LANGUAGE_VERSION_CODE: i32 = 200;

/// Name handed to the diagnostic tool when a session starts.
pub const DEBUGGER_SESSION_NAME: &str = "RuntimeConfigManager";

/// Script extension for plain ECMAScript files.
pub const ECMA_SCRIPT_EXTENSION: &str = "ecma";

/// Script extension for server-side templates.
pub const ESP_SCRIPT_EXTENSION: &str = "esp";

/// Language name reported by the engine factory.
pub const LANGUAGE_NAME: &str = "ECMAScript";

/// Language version reported by the engine factory.
pub const LANGUAGE_VERSION: &str = "partial ECMAScript 2015 support";

/// Base engine name; the runtime version is appended on activation.
pub const BASE_ENGINE_NAME: &str = "Hostbridge Script Engine";

/// Reported threading model.
pub const THREADING_MODEL: &str = "MULTITHREADED";
