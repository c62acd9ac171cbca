//! Wrapper registry mapping native classes to host object classes
//!
//! When a native value crosses into script space, the scope looks up its
//! class here to find the host object class that should wrap it.

use std::sync::Arc;

use hostbridge_sdk::NativeClass;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Native class to host object class name mapping
#[derive(Debug, Default)]
pub struct WrapperRegistry {
    entries: RwLock<FxHashMap<NativeClass, Arc<str>>>,
}

impl WrapperRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bridge` as the wrapper for `class`
    ///
    /// A later registration for the same class replaces the earlier one.
    ///
    /// # Arguments
    /// * `class` - The native class to wrap
    /// * `bridge` - Host object class name
    ///
    /// # Returns
    /// * `Some(previous)` - The replaced host object class name
    /// * `None` - The class was not registered before
    pub fn register(&self, class: NativeClass, bridge: &str) -> Option<Arc<str>> {
        let previous = self.entries.write().insert(class, Arc::from(bridge));
        if let Some(prev) = previous.as_deref() {
            if prev != bridge {
                log::warn!(
                    "native class {} was wrapped by {}, now wrapped by {}",
                    class,
                    prev,
                    bridge
                );
            }
        }
        previous
    }

    /// Host object class name wrapping `class`
    pub fn lookup(&self, class: &NativeClass) -> Option<Arc<str>> {
        self.entries.read().get(class).cloned()
    }

    /// Check if `class` has a wrapper
    pub fn contains(&self, class: &NativeClass) -> bool {
        self.entries.read().contains_key(class)
    }

    /// All native classes wrapped by `bridge`, sorted by name
    pub fn classes_for(&self, bridge: &str) -> Vec<NativeClass> {
        let mut classes: Vec<NativeClass> = self
            .entries
            .read()
            .iter()
            .filter(|(_, name)| name.as_ref() == bridge)
            .map(|(class, _)| *class)
            .collect();
        classes.sort_by_key(|c| c.name());
        classes
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove every registration
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
