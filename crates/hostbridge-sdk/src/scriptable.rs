//! Member resolution hooks consumed by the script runtime
//!
//! The runtime owns property/method dispatch. For every member access on a
//! bridged value it calls [`Scriptable::get`] with the requesting scope; a
//! `None` result is the normal "member not found" outcome, never an error.

use std::sync::Arc;

use crate::class_info::NativeClassInfo;
use crate::error::{NativeError, NativeResult};
use crate::object::{NativeClass, NativeRef};
use crate::value::Value;

/// Scope in which members are resolved.
///
/// Supplies the declared member tables for static types and wraps values
/// that cross back into script space.
pub trait Scope: Send + Sync {
    /// Declared member table for a static type, if registered
    fn class_info(&self, class: &NativeClass) -> Option<Arc<NativeClassInfo>>;

    /// Wrap a value before handing it to the script
    fn wrap(&self, value: Value) -> Value;
}

/// A value whose members the script runtime resolves by name.
pub trait Scriptable: Send + Sync {
    /// Script-visible class name
    fn class_name(&self) -> &str;

    /// Resolve a member. `None` means not found.
    fn get(&self, name: &str, scope: &Arc<dyn Scope>) -> Option<Value>;

    /// The native object behind this value, if still attached
    fn wrapped_object(&self) -> Option<NativeRef>;

    /// Check whether a member resolves
    fn has(&self, name: &str, scope: &Arc<dyn Scope>) -> bool {
        self.get(name, scope).is_some()
    }

    /// Resolve a member and call it
    fn invoke(&self, name: &str, args: &[Value], scope: &Arc<dyn Scope>) -> NativeResult<Value> {
        match self.get(name, scope) {
            Some(Value::Function(func)) => func.call(args),
            Some(_) => Err(NativeError::NotCallable(name.to_string())),
            None => Err(NativeError::MemberNotFound(name.to_string())),
        }
    }
}
