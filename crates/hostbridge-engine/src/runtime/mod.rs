//! Runtime configuration, execution contexts and the debugger lifecycle

mod config;
mod context;
mod debugger;
pub mod global;
mod manager;

pub use config::{EngineConfig, Feature, LanguageVersion, OptimizationLevel, RuntimeConfig};
pub use context::{
    ContextId, ContextListener, ExecutionContext, Listenable, ListenerId, ListenerSet,
};
pub use debugger::{
    DebuggerStatus, DiagnosticTool, ScopeProvider, SessionEndHandle, SessionId, ToolFactory,
};
pub use global::ContextFactory;
pub use manager::RuntimeConfigManager;
