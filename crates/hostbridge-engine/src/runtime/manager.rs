//! Runtime configuration manager
//!
//! Creates execution contexts with the engine's configuration and owns the
//! optional debugger session. One manager can be installed as the process's
//! global context factory through [`RuntimeConfigManager::get_instance`];
//! managers created with [`RuntimeConfigManager::new`] are independent.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use super::config::{Feature, RuntimeConfig};
use super::context::{ContextListener, ExecutionContext, Listenable, ListenerId, ListenerSet};
use super::debugger::{
    DebuggerSession, DebuggerState, DebuggerStatus, ScopeProvider, SessionEndHandle, SessionId,
    ToolFactory,
};
use super::global::{self, ContextFactory};
use crate::defaults::DEBUGGER_SESSION_NAME;
use crate::error::{ConfigError, DebuggerError};

/// Context factory carrying the engine configuration.
pub struct RuntimeConfigManager {
    config: RuntimeConfig,
    debugging: AtomicBool,
    scope_provider: Arc<dyn ScopeProvider>,
    listeners: ListenerSet,
    tool_factory: RwLock<Option<ToolFactory>>,
    debugger: Mutex<DebuggerState>,
    this: Weak<Self>,
}

impl RuntimeConfigManager {
    /// Create a manager that is not installed globally
    pub fn new(config: RuntimeConfig, scope_provider: Arc<dyn ScopeProvider>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            config,
            debugging: AtomicBool::new(config.debugging),
            scope_provider,
            listeners: ListenerSet::new(),
            tool_factory: RwLock::new(None),
            debugger: Mutex::new(DebuggerState::Detached),
            this: this.clone(),
        })
    }

    /// The globally installed manager, creating and installing it if the
    /// slot is empty.
    ///
    /// When a manager is already installed it is returned as is, even if
    /// `config` differs from its configuration.
    ///
    /// # Errors
    /// * `ConfigError::ForeignFactory` - the slot holds another kind of factory
    pub fn get_instance(
        config: RuntimeConfig,
        scope_provider: Arc<dyn ScopeProvider>,
    ) -> Result<Arc<Self>, ConfigError> {
        if let Some(existing) = Self::current() {
            Self::note_config_mismatch(&existing, &config);
            return Ok(existing);
        }

        let mut slot = global::slot().write();
        if let Some(installed) = slot.as_ref() {
            let existing = installed
                .clone()
                .into_any()
                .downcast::<Self>()
                .map_err(|_| ConfigError::ForeignFactory)?;
            Self::note_config_mismatch(&existing, &config);
            return Ok(existing);
        }

        let manager = Self::new(config, scope_provider);
        let factory: Arc<dyn ContextFactory> = manager.clone();
        *slot = Some(factory);
        log::debug!("installed runtime manager as global context factory");
        Ok(manager)
    }

    /// The globally installed manager, if the slot holds one
    pub fn current() -> Option<Arc<Self>> {
        let installed = global::slot().read().clone()?;
        installed.into_any().downcast::<Self>().ok()
    }

    /// Uninstall the global manager, detaching its debugger.
    ///
    /// A foreign factory in the slot is left in place.
    pub fn teardown() -> Option<Arc<Self>> {
        let manager = {
            let mut slot = global::slot().write();
            let manager = slot.clone()?.into_any().downcast::<Self>().ok()?;
            *slot = None;
            manager
        };
        manager.detach_debugger();
        log::debug!("runtime manager uninstalled");
        Some(manager)
    }

    fn note_config_mismatch(existing: &Self, requested: &RuntimeConfig) {
        if existing.config != *requested {
            log::debug!(
                "runtime manager already installed with {:?}; ignoring {:?}",
                existing.config,
                requested
            );
        }
    }

    /// Configuration contexts are created with
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Create a context and notify listeners
    pub fn create_context(&self) -> ExecutionContext {
        let context = ExecutionContext::new(self.config);
        self.listeners.notify_created(&context);
        context
    }

    /// Notify listeners that a context is released
    pub fn release_context(&self, context: &ExecutionContext) {
        self.listeners.notify_released(context);
    }

    /// Feature value for created contexts
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.config.has_feature(feature)
    }

    /// Number of registered context listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Enable or disable debugging for future evaluations
    pub fn set_debugging(&self, enable: bool) {
        self.debugging.store(enable, Ordering::SeqCst);
    }

    /// Check if debugging is enabled
    pub fn is_debugging(&self) -> bool {
        self.debugging.load(Ordering::SeqCst)
    }

    /// Set the factory used to create diagnostic tools
    pub fn set_tool_factory(&self, factory: Option<ToolFactory>) {
        *self.tool_factory.write() = factory;
    }

    /// Current debugger state
    pub fn debugger_state(&self) -> DebuggerStatus {
        self.debugger.lock().status()
    }

    /// Start a debugger session if debugging is enabled and none is running.
    ///
    /// The tool is created and attached without holding the state lock, so it
    /// may report its own end from inside `attach_to`. Failures are logged; the
    /// manager then stays detached.
    pub fn attach_debugger(&self) -> Option<SessionId> {
        if !self.is_debugging() {
            return None;
        }

        let (id, factory) = {
            let mut state = self.debugger.lock();
            match &*state {
                DebuggerState::Attached(session) => return Some(session.id),
                DebuggerState::Attaching(_) | DebuggerState::Releasing(_) => return None,
                DebuggerState::Detached => {}
            }

            let factory = self.tool_factory.read().clone();
            let Some(factory) = factory else {
                log::debug!("debugging enabled but no diagnostic tool is configured");
                return None;
            };
            let id = SessionId::next();
            *state = DebuggerState::Attaching(id);
            (id, factory)
        };

        let result = self.start_session(id, &factory);

        let mut state = self.debugger.lock();
        let current = state.status();
        match result {
            Ok(session) if current == DebuggerStatus::Attaching(id) => {
                *state = DebuggerState::Attached(session);
                log::info!("debugger session {} attached", id.as_u64());
                Some(id)
            }
            Ok(session) => {
                // Detached while attaching: release the tool here
                let detached = current == DebuggerStatus::Releasing(id);
                if detached {
                    *state = DebuggerState::Detached;
                }
                drop(state);
                if detached {
                    release_tool(session);
                } else {
                    log::debug!("debugger session {} ended while attaching", id.as_u64());
                }
                None
            }
            Err(e) => {
                if matches!(
                    current,
                    DebuggerStatus::Attaching(pending) | DebuggerStatus::Releasing(pending)
                        if pending == id
                ) {
                    *state = DebuggerState::Detached;
                }
                log::warn!("attach_debugger: failed setting up the debugger: {}", e);
                None
            }
        }
    }

    fn start_session(
        &self,
        id: SessionId,
        factory: &ToolFactory,
    ) -> Result<DebuggerSession, DebuggerError> {
        let handle = SessionEndHandle::new(self.this.clone(), id);
        let mut tool = factory(DEBUGGER_SESSION_NAME, handle)?;
        let target: Arc<dyn Listenable> = self.this.upgrade().ok_or(DebuggerError::ManagerGone)?;
        tool.set_scope_provider(Some(self.scope_provider.clone()));
        tool.attach_to(target)?;
        Ok(DebuggerSession { id, tool })
    }

    /// Tear down the running debugger session, if any.
    ///
    /// Clears the tool's scope provider, then detaches and disposes the tool. Calling
    /// this with no session is a no-op. A session still attaching is released by
    /// the attaching thread once the tool returns.
    pub fn detach_debugger(&self) {
        let session = {
            let mut state = self.debugger.lock();
            match std::mem::replace(&mut *state, DebuggerState::Detached) {
                DebuggerState::Attached(session) => {
                    *state = DebuggerState::Releasing(session.id);
                    session
                }
                DebuggerState::Attaching(id) => {
                    *state = DebuggerState::Releasing(id);
                    return;
                }
                other => {
                    *state = other;
                    return;
                }
            }
        };

        let id = session.id;
        release_tool(session);

        let mut state = self.debugger.lock();
        if matches!(*state, DebuggerState::Releasing(releasing) if releasing == id) {
            *state = DebuggerState::Detached;
        }
    }

    /// The tool ended session `session` on its own.
    ///
    /// The session is forgotten without calling back into the tool. Stale
    /// notifications, and those arriving while the manager itself is
    /// releasing the session, are ignored.
    pub fn on_session_ended(&self, session: SessionId) {
        let ended = {
            let mut state = self.debugger.lock();
            match &*state {
                DebuggerState::Attached(current) if current.id == session => {
                    std::mem::replace(&mut *state, DebuggerState::Detached)
                }
                DebuggerState::Attaching(current) if *current == session => {
                    std::mem::replace(&mut *state, DebuggerState::Detached)
                }
                _ => {
                    log::debug!("ignoring end of session {}", session.as_u64());
                    return;
                }
            }
        };
        drop(ended);
        log::info!("debugger session {} ended by tool", session.as_u64());
    }
}

fn release_tool(session: DebuggerSession) {
    let DebuggerSession { id, mut tool } = session;
    tool.set_scope_provider(None);
    tool.detach();
    tool.dispose();
    log::info!("debugger session {} detached", id.as_u64());
}

impl Listenable for RuntimeConfigManager {
    fn add_listener(&self, listener: Arc<dyn ContextListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

impl ContextFactory for RuntimeConfigManager {
    fn make_context(&self) -> ExecutionContext {
        self.create_context()
    }

    fn has_feature(&self, feature: Feature) -> bool {
        RuntimeConfigManager::has_feature(self, feature)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl fmt::Debug for RuntimeConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfigManager")
            .field("config", &self.config)
            .field("debugging", &self.is_debugging())
            .field("debugger", &self.debugger_state())
            .finish()
    }
}
