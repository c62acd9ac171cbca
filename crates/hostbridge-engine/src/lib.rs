//! Hostbridge engine
//!
//! Exposes native objects to an embedded script runtime:
//!
//! - [`bridge`]: per-type override tables and the lazily built reflective
//!   adapter behind every bridged object
//! - [`host_object`] / [`registry`]: host object classes and the mapping from
//!   native classes to the host object that wraps them
//! - [`scope`]: the root scope tying host objects, wrappers and imports together
//! - [`runtime`]: context configuration, the global context factory and the
//!   debugger session lifecycle
//! - [`factory`]: activation, configuration loading and script engine handles

pub mod bridge;
pub mod defaults;
pub mod error;
pub mod factory;
pub mod host_object;
pub mod registry;
pub mod runtime;
pub mod scope;

pub use bridge::{BridgeType, NativeBridge, Override, OverrideTable, OverrideTableBuilder, ReflectiveAdapter};
pub use error::{ConfigError, DebuggerError, EngineError, EngineResult, RegistrationError};
pub use factory::{ContextGuard, EngineFactory, EngineMetadata, ScriptEngine};
pub use host_object::{HostObject, HostObjectClass, HostObjectProvider, HostObjectType, WrappedClasses};
pub use registry::{ClassInfoRegistry, WrapperRegistry};
pub use runtime::{
    ContextFactory, ContextListener, DebuggerStatus, DiagnosticTool, EngineConfig, ExecutionContext,
    Feature, LanguageVersion, Listenable, ListenerId, OptimizationLevel, RuntimeConfig,
    RuntimeConfigManager, ScopeProvider, SessionEndHandle, SessionId, ToolFactory,
};
pub use scope::{InstallReport, RootScope};

// Re-export the SDK so embedders need only one dependency
pub use hostbridge_sdk as sdk;
