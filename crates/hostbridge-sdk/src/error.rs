//! Error types for the bridge SDK

/// Result type for native member access
pub type NativeResult<T> = Result<T, NativeError>;

/// Errors raised while reading or invoking native members
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NativeError {
    /// Type mismatch during conversion or downcast
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Invalid argument
    #[error("Argument error: {0}")]
    ArgumentError(String),

    /// No member with this name is visible on the target
    #[error("Member '{0}' not found")]
    MemberNotFound(String),

    /// The member exists but is not a function
    #[error("Member '{0}' is not callable")]
    NotCallable(String),

    /// No overload of the method accepts the given argument count
    #[error("No overload of '{name}' accepts {argc} argument(s)")]
    NoMatchingOverload {
        /// Method name
        name: String,
        /// Number of arguments supplied
        argc: usize,
    },

    /// The wrapped native object is gone (detached bridge or dropped scope)
    #[error("Native object for '{0}' is no longer available")]
    Detached(String),

    /// Failure reported by the native object itself
    #[error("{0}")]
    Native(String),
}

impl From<String> for NativeError {
    fn from(s: String) -> Self {
        NativeError::Native(s)
    }
}

impl From<&str> for NativeError {
    fn from(s: &str) -> Self {
        NativeError::Native(s.to_string())
    }
}
