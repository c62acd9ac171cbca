//! Declared member tables by static type

use std::sync::Arc;

use hostbridge_sdk::{NativeClass, NativeClassInfo};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Registry of [`NativeClassInfo`] tables, keyed by class.
#[derive(Debug, Default)]
pub struct ClassInfoRegistry {
    tables: RwLock<FxHashMap<NativeClass, Arc<NativeClassInfo>>>,
}

impl ClassInfoRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, replacing any earlier one for the same class
    pub fn register(&self, info: Arc<NativeClassInfo>) {
        self.tables.write().insert(info.class(), info);
    }

    /// Table for `class`
    pub fn get(&self, class: &NativeClass) -> Option<Arc<NativeClassInfo>> {
        self.tables.read().get(class).cloned()
    }

    /// Find a registered class by its short name
    pub fn find_by_name(&self, name: &str) -> Option<NativeClass> {
        self.tables
            .read()
            .keys()
            .find(|class| class.name() == name)
            .copied()
    }

    /// Number of registered tables
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}
