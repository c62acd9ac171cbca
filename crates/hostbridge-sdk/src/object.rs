//! Native object capability and class identity
//!
//! The script runtime never reflects on Rust types. Instead every native
//! object implements [`NativeObject`], which reports its runtime class and
//! exposes dynamic members by name. Declared members (methods and typed
//! properties) live in a [`NativeClassInfo`](crate::NativeClassInfo) keyed by
//! the declared (static) class.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::value::Value;

/// Identity of a native type.
///
/// Equality and hashing use the `TypeId` only; the name is for display.
/// `T` may be unsized, so `NativeClass::of::<dyn Resource>()` can act as the
/// declared type of objects whose runtime class is a concrete struct.
#[derive(Clone, Copy)]
pub struct NativeClass {
    id: TypeId,
    name: &'static str,
}

impl NativeClass {
    /// Class identity of `T`, named after its short type name
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    /// Class identity of `T` with an explicit display name
    pub fn named<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Underlying type id
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for NativeClass {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NativeClass {}

impl Hash for NativeClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for NativeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeClass({})", self.name)
    }
}

impl fmt::Display for NativeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip module paths (and the `dyn ` prefix) from `std::any::type_name` output.
fn short_type_name(full: &'static str) -> &'static str {
    let full = full.strip_prefix("dyn ").unwrap_or(full);
    let head = full.split(['<', ' ']).next().unwrap_or(full);
    head.rsplit("::").next().unwrap_or(head)
}

/// Capability every native object exposed to scripts must implement.
pub trait NativeObject: Send + Sync + 'static {
    /// Runtime class of this object
    fn native_class(&self) -> NativeClass;

    /// Downcasting support for typed member tables
    fn as_any(&self) -> &dyn Any;

    /// Dynamic member lookup (map entries, bean-style values, ...)
    ///
    /// Consulted after the declared members of the static type.
    fn get_property(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Shared handle to a native object
pub type NativeRef = Arc<dyn NativeObject>;

/// Box a native object into a [`NativeRef`]
pub fn native_ref<T: NativeObject>(object: T) -> NativeRef {
    Arc::new(object)
}

/// Downcast a native object to its concrete type
pub fn downcast<T: NativeObject>(object: &dyn NativeObject) -> Option<&T> {
    object.as_any().downcast_ref::<T>()
}
