//! Debugger session types
//!
//! The manager owns at most one diagnostic session. Its lifecycle:
//!
//! ```text
//! Detached --attach--> Attaching --> Attached --detach--> Releasing --> Detached
//!                         |              |
//!                         |              +--tool ended itself--> Detached
//!                         +--ended or detached meanwhile--> Detached
//! ```
//!
//! The tool is only ever called with the state lock released. Only the
//! `detach` path calls `detach`/`dispose` on the tool; a session the tool ended
//! on its own is just forgotten, so teardown never runs twice.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::context::Listenable;
use super::manager::RuntimeConfigManager;
use crate::error::DebuggerError;
use crate::scope::RootScope;

/// Supplies the root scope to a diagnostic tool.
pub trait ScopeProvider: Send + Sync {
    /// Current root scope, if one is built
    fn scope(&self) -> Option<Arc<RootScope>>;
}

/// An interactive diagnostic tool attached to the runtime manager.
pub trait DiagnosticTool: Send {
    /// Start observing contexts created by `target`
    fn attach_to(&mut self, target: Arc<dyn Listenable>) -> Result<(), DebuggerError>;

    /// Set or clear the scope provider
    fn set_scope_provider(&mut self, provider: Option<Arc<dyn ScopeProvider>>);

    /// Stop observing contexts
    fn detach(&mut self);

    /// Release the tool's resources
    fn dispose(&mut self);
}

/// Creates a diagnostic tool for a new session.
pub type ToolFactory =
    Arc<dyn Fn(&str, SessionEndHandle) -> Result<Box<dyn DiagnosticTool>, DebuggerError> + Send + Sync>;

/// Identifier of one debugger session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        SessionId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Given to a tool so it can report that it ended its own session.
#[derive(Clone)]
pub struct SessionEndHandle {
    manager: Weak<RuntimeConfigManager>,
    session: SessionId,
}

impl SessionEndHandle {
    pub(crate) fn new(manager: Weak<RuntimeConfigManager>, session: SessionId) -> Self {
        Self { manager, session }
    }

    /// Session this handle belongs to
    pub fn session_id(&self) -> SessionId {
        self.session
    }

    /// Report that the tool has shut itself down
    pub fn session_ended(&self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.on_session_ended(self.session);
        }
    }
}

impl fmt::Debug for SessionEndHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEndHandle")
            .field("session", &self.session)
            .finish()
    }
}

/// Observable debugger state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebuggerStatus {
    /// No session
    Detached,
    /// Tool being created and attached
    Attaching(SessionId),
    /// Session running
    Attached(SessionId),
    /// Session being torn down
    Releasing(SessionId),
}

pub(crate) struct DebuggerSession {
    pub(crate) id: SessionId,
    pub(crate) tool: Box<dyn DiagnosticTool>,
}

pub(crate) enum DebuggerState {
    Detached,
    Attaching(SessionId),
    Attached(DebuggerSession),
    Releasing(SessionId),
}

impl DebuggerState {
    pub(crate) fn status(&self) -> DebuggerStatus {
        match self {
            DebuggerState::Detached => DebuggerStatus::Detached,
            DebuggerState::Attaching(id) => DebuggerStatus::Attaching(*id),
            DebuggerState::Attached(session) => DebuggerStatus::Attached(session.id),
            DebuggerState::Releasing(id) => DebuggerStatus::Releasing(*id),
        }
    }
}
