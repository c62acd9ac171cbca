//! Per-type override tables

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use hostbridge_sdk::{NativeResult, Value};
use once_cell::sync::{Lazy, OnceCell};
use rustc_hash::FxHashMap;

use super::BridgeType;

/// Property override: `None` means not found, with no fallthrough.
pub type OverrideProperty<T> = Arc<dyn Fn(&T) -> Option<Value> + Send + Sync>;

/// Method override, bound to the bridge instance when resolved
pub type OverrideMethod<T> = Arc<dyn Fn(&T, &[Value]) -> NativeResult<Value> + Send + Sync>;

/// A member the bridge type answers itself
pub enum Override<T> {
    /// Property computed from the bridge instance
    Property(OverrideProperty<T>),
    /// Method callable by scripts
    Method(OverrideMethod<T>),
}

impl<T> Clone for Override<T> {
    fn clone(&self) -> Self {
        match self {
            Override::Property(f) => Override::Property(f.clone()),
            Override::Method(f) => Override::Method(f.clone()),
        }
    }
}

/// Names a bridge type resolves itself, with their implementations.
pub struct OverrideTable<T> {
    entries: FxHashMap<String, Override<T>>,
}

impl<T: BridgeType> OverrideTable<T> {
    /// Start building a table
    pub fn builder() -> OverrideTableBuilder<T> {
        OverrideTableBuilder {
            entries: FxHashMap::default(),
        }
    }

    /// The process-wide table for `T`, computed on first use.
    pub fn shared() -> Arc<Self> {
        let key = TypeId::of::<T>();
        let cell = match OVERRIDE_TABLES.get(&key) {
            Some(cell) => cell.value().clone(),
            None => OVERRIDE_TABLES.entry(key).or_default().value().clone(),
        };
        // The map shard is released before the table is computed, so a
        // type may inherit from another type's shared table.
        let table = cell
            .get_or_init(|| {
                let table = T::overrides();
                log::debug!(
                    "override table for {}: {:?}",
                    T::CLASS_NAME,
                    table.names()
                );
                Arc::new(table) as Arc<dyn Any + Send + Sync>
            })
            .clone();
        match table.downcast::<Self>() {
            Ok(table) => table,
            Err(_) => {
                // Keyed by `TypeId::of::<T>()`, so the entry is always a `Self`
                debug_assert!(false, "override table type mismatch for {}", T::CLASS_NAME);
                log::error!(
                    "override table for {} has the wrong type; using an unshared table",
                    T::CLASS_NAME
                );
                Arc::new(T::overrides())
            }
        }
    }
}

impl<T> OverrideTable<T> {
    /// Look up an override
    pub fn get(&self, name: &str) -> Option<&Override<T>> {
        self.entries.get(name)
    }

    /// Check if `name` is overridden
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Overridden names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of overrides
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no names are overridden
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> fmt::Debug for OverrideTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideTable")
            .field("names", &self.names())
            .finish()
    }
}

type TableCell = Arc<OnceCell<Arc<dyn Any + Send + Sync>>>;

static OVERRIDE_TABLES: Lazy<DashMap<TypeId, TableCell>> = Lazy::new(DashMap::new);

/// Builder for [`OverrideTable`].
pub struct OverrideTableBuilder<T> {
    entries: FxHashMap<String, Override<T>>,
}

impl<T: BridgeType> OverrideTableBuilder<T> {
    /// Override a property
    pub fn property(
        mut self,
        name: &str,
        getter: impl Fn(&T) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.entries
            .insert(name.to_string(), Override::Property(Arc::new(getter)));
        self
    }

    /// Override a method
    pub fn method(
        mut self,
        name: &str,
        body: impl Fn(&T, &[Value]) -> NativeResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.entries
            .insert(name.to_string(), Override::Method(Arc::new(body)));
        self
    }

    /// Copy every entry of `parent` that is not already declared.
    ///
    /// Entries declared on this builder, before or after the call, win.
    pub fn inherit(mut self, parent: &OverrideTable<T>) -> Self {
        for (name, entry) in &parent.entries {
            self.entries
                .entry(name.clone())
                .or_insert_with(|| entry.clone());
        }
        self
    }

    /// Like [`inherit`](Self::inherit), adapting a table of another bridge type.
    pub fn inherit_from<P: BridgeType>(
        mut self,
        parent: &OverrideTable<P>,
        project: impl Fn(&T) -> &P + Send + Sync + Clone + 'static,
    ) -> Self {
        for (name, entry) in &parent.entries {
            if self.entries.contains_key(name) {
                continue;
            }
            let project = project.clone();
            let adapted = match entry.clone() {
                Override::Property(getter) => {
                    Override::Property(Arc::new(move |this: &T| getter(project(this))) as _)
                }
                Override::Method(body) => Override::Method(Arc::new(
                    move |this: &T, args: &[Value]| body(project(this), args),
                ) as _),
            };
            self.entries.insert(name.clone(), adapted);
        }
        self
    }

    /// Build the table
    pub fn build(self) -> OverrideTable<T> {
        OverrideTable {
            entries: self.entries,
        }
    }
}
