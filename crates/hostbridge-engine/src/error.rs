//! Engine error types.

use hostbridge_sdk::NativeError;

/// Configuration and global-installation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The global context factory slot holds a factory installed by someone else
    #[error("Custom context factory already initialized by another component")]
    ForeignFactory,

    /// The global context factory slot is already occupied
    #[error("Global context factory already initialized")]
    AlreadyInitialized,

    /// A configuration value that has no safe default
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while starting a diagnostic session.
///
/// These never escape the manager: a failed attach is logged and the manager
/// stays without a session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DebuggerError {
    /// The tool could not be constructed
    #[error("Debugger tool failed to start: {0}")]
    Tool(String),

    /// The tool refused to attach to the manager
    #[error("Debugger could not attach: {0}")]
    Attach(String),

    /// The manager was dropped while the session was starting
    #[error("Runtime manager is no longer available")]
    ManagerGone,
}

/// Failure to prepare one host object class for installation.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// Reading the declared wrapped classes failed
    #[error("Cannot prepare host object {class}: {source}")]
    Prepare {
        /// Host object class name
        class: String,
        /// Underlying failure
        #[source]
        source: NativeError,
    },

    /// Host object declared an empty class name
    #[error("Host object class name is empty")]
    EmptyClassName,
}

/// Top-level engine errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Operation needs an activated factory
    #[error("Engine factory is not active")]
    NotActive,

    /// Native member access failed
    #[error(transparent)]
    Native(#[from] NativeError),
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
