//! Process-wide context factory slot
//!
//! The embedded runtime accepts one global context factory per process. The
//! slot can be filled once; the runtime manager installs itself here, and
//! other components may have claimed it first.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::config::Feature;
use super::context::{ExecutionContext, Listenable};
use crate::error::ConfigError;

/// A factory the runtime asks for new execution contexts.
pub trait ContextFactory: Listenable {
    /// Create a configured context
    fn make_context(&self) -> ExecutionContext;

    /// Feature value for contexts from this factory
    fn has_feature(&self, feature: Feature) -> bool;

    /// Type-erased self, used to recognize a factory after installation
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

type Slot = RwLock<Option<Arc<dyn ContextFactory>>>;

static GLOBAL_FACTORY: Lazy<Slot> = Lazy::new(|| RwLock::new(None));

pub(crate) fn slot() -> &'static Slot {
    &GLOBAL_FACTORY
}

/// The installed global factory
pub fn global_factory() -> Option<Arc<dyn ContextFactory>> {
    GLOBAL_FACTORY.read().clone()
}

/// Install a global factory.
///
/// # Errors
/// * `ConfigError::AlreadyInitialized` - a factory is already installed
pub fn init_global(factory: Arc<dyn ContextFactory>) -> Result<(), ConfigError> {
    let mut slot = GLOBAL_FACTORY.write();
    if slot.is_some() {
        return Err(ConfigError::AlreadyInitialized);
    }
    *slot = Some(factory);
    Ok(())
}

/// Remove `factory` from the slot if it is the installed one.
pub fn uninstall_global(factory: &Arc<dyn ContextFactory>) -> bool {
    let mut slot = GLOBAL_FACTORY.write();
    let installed = slot
        .as_ref()
        .is_some_and(|current| std::ptr::addr_eq(Arc::as_ptr(current), Arc::as_ptr(factory)));
    if installed {
        *slot = None;
    }
    installed
}
