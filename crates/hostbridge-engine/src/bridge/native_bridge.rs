//! Per-instance bridge state

use std::fmt;
use std::sync::{Arc, Weak};

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use hostbridge_sdk::{NativeClass, NativeFunction, NativeRef, Scope, Scriptable, Value};
use once_cell::sync::OnceCell;

use super::adapter::{wrap_in, ReflectiveAdapter};
use super::{BridgeType, Override, OverrideTable};

/// A bridge instance: the wrapped value plus its lazily built adapter.
///
/// The adapter cell is assigned at most once, even when the first lookups
/// race on several threads; every later lookup sees the same adapter.
pub struct NativeBridge<T: BridgeType> {
    inner: T,
    static_type: NativeClass,
    overrides: Arc<OverrideTable<T>>,
    adapter: OnceCell<Arc<ReflectiveAdapter>>,
    this: Weak<Self>,
    #[cfg(test)]
    adapter_builds: AtomicUsize,
}

impl<T: BridgeType> NativeBridge<T> {
    /// Wrap a bridge value
    pub fn new(inner: T) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            static_type: inner.static_type(),
            inner,
            overrides: OverrideTable::shared(),
            adapter: OnceCell::new(),
            this: this.clone(),
            #[cfg(test)]
            adapter_builds: AtomicUsize::new(0),
        })
    }

    /// The bridge value
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Static type fixed at construction
    pub fn static_type(&self) -> NativeClass {
        self.static_type
    }

    /// Overrides shared by every instance of `T`
    pub fn overrides(&self) -> &Arc<OverrideTable<T>> {
        &self.overrides
    }

    /// The adapter, if a delegated lookup has built it
    pub fn adapter(&self) -> Option<&Arc<ReflectiveAdapter>> {
        self.adapter.get()
    }

    fn adapter_for(&self, native: NativeRef, scope: &Arc<dyn Scope>) -> &Arc<ReflectiveAdapter> {
        self.adapter.get_or_init(|| {
            #[cfg(test)]
            self.adapter_builds.fetch_add(1, Ordering::SeqCst);
            Arc::new(ReflectiveAdapter::new(scope, native, self.static_type))
        })
    }

    fn resolve_override(
        &self,
        name: &str,
        entry: &Override<T>,
        scope: &Arc<dyn Scope>,
    ) -> Option<Value> {
        match entry {
            Override::Property(getter) => getter(&self.inner).map(|value| scope.wrap(value)),
            Override::Method(body) => {
                let this = self.this.upgrade()?;
                let body = body.clone();
                let scope = Arc::downgrade(scope);
                Some(Value::Function(NativeFunction::new(name, move |args| {
                    let result = body(&this.inner, args)?;
                    Ok(wrap_in(&scope, result))
                })))
            }
        }
    }
}

impl<T: BridgeType> Scriptable for NativeBridge<T> {
    fn class_name(&self) -> &str {
        T::CLASS_NAME
    }

    fn get(&self, name: &str, scope: &Arc<dyn Scope>) -> Option<Value> {
        let native = self.inner.wrapped_object()?;
        if let Some(entry) = self.overrides.get(name) {
            return self.resolve_override(name, entry, scope);
        }
        self.adapter_for(native, scope).get(name)
    }

    fn wrapped_object(&self) -> Option<NativeRef> {
        self.inner.wrapped_object()
    }
}

impl<T: BridgeType> fmt::Debug for NativeBridge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBridge")
            .field("class", &T::CLASS_NAME)
            .field("static_type", &self.static_type)
            .field("adapter", &self.adapter.get().is_some())
            .finish()
    }
}
