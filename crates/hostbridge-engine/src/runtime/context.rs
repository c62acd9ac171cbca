//! Execution contexts and context listeners

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::config::{Feature, LanguageVersion, OptimizationLevel, RuntimeConfig};

/// Unique identifier for an execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    /// Allocate a new unique ID
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        ContextId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

/// A configured context one evaluation runs in.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    id: ContextId,
    config: RuntimeConfig,
}

impl ExecutionContext {
    /// Create a context from a configuration
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            id: ContextId::new(),
            config,
        }
    }

    /// Context ID
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Language level
    pub fn language_version(&self) -> LanguageVersion {
        self.config.language_version
    }

    /// Optimization level
    pub fn optimization_level(&self) -> OptimizationLevel {
        self.config.optimization_level
    }

    /// Feature value for this context
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.config.has_feature(feature)
    }
}

/// Observer of context creation and release.
pub trait ContextListener: Send + Sync {
    /// A context was created
    fn context_created(&self, context: &ExecutionContext);

    /// A context was released
    fn context_released(&self, _context: &ExecutionContext) {}
}

/// Handle returned by [`Listenable::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Something context listeners can be registered with.
pub trait Listenable: Send + Sync {
    /// Register a listener
    fn add_listener(&self, listener: Arc<dyn ContextListener>) -> ListenerId;

    /// Unregister a listener. Returns false if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

/// Ordered listener list.
#[derive(Default)]
pub struct ListenerSet {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, Arc<dyn ContextListener>)>>,
}

impl ListenerSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener
    pub fn add(&self, listener: Arc<dyn ContextListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    /// Remove a listener
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Number of listeners
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Notify listeners of a created context
    pub fn notify_created(&self, context: &ExecutionContext) {
        for listener in self.snapshot() {
            listener.context_created(context);
        }
    }

    /// Notify listeners of a released context
    pub fn notify_released(&self, context: &ExecutionContext) {
        for listener in self.snapshot() {
            listener.context_released(context);
        }
    }

    // Listeners run without the lock held so they may add or remove listeners.
    fn snapshot(&self) -> Vec<Arc<dyn ContextListener>> {
        self.listeners.read().iter().map(|(_, l)| l.clone()).collect()
    }
}
