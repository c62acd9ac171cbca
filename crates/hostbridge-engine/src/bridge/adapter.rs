//! Reflective member access for a wrapped native object

use std::fmt;
use std::sync::{Arc, Weak};

use hostbridge_sdk::{
    select_overload, MethodOverload, NativeClass, NativeClassInfo, NativeFunction, NativeMember,
    NativeRef, Scope, Value,
};

/// Exposes the declared members of a native object's static type.
///
/// Lookup order is declared method, then declared property, then the
/// object's own dynamic properties. When the static type has no registered
/// member table only the dynamic properties are visible.
pub struct ReflectiveAdapter {
    target: NativeRef,
    static_type: NativeClass,
    members: Option<Arc<NativeClassInfo>>,
    scope: Weak<dyn Scope>,
}

impl ReflectiveAdapter {
    /// Build an adapter for `target` in `scope`.
    pub fn new(scope: &Arc<dyn Scope>, target: NativeRef, static_type: NativeClass) -> Self {
        let members = scope.class_info(&static_type);
        if members.is_none() {
            log::debug!(
                "no member table for {}; exposing dynamic properties only",
                static_type
            );
        }
        Self {
            target,
            static_type,
            members,
            scope: Arc::downgrade(scope),
        }
    }

    /// Resolve a member, wrapped for the script
    pub fn get(&self, name: &str) -> Option<Value> {
        let value = match self.members.as_ref().and_then(|m| m.member(name)) {
            Some(NativeMember::Method(overloads)) => {
                Value::Function(self.bind_method(name, overloads.clone()))
            }
            Some(NativeMember::Property(getter)) => match getter(self.target.as_ref()) {
                Ok(value) => value,
                Err(e) => {
                    log::debug!("property {}.{} unreadable: {}", self.static_type, name, e);
                    return None;
                }
            },
            None => self.target.get_property(name)?,
        };
        Some(wrap_in(&self.scope, value))
    }

    /// Check whether `name` resolves
    pub fn has(&self, name: &str) -> bool {
        self.members
            .as_ref()
            .is_some_and(|m| m.has_member(name))
            || self.target.get_property(name).is_some()
    }

    /// The wrapped object
    pub fn target(&self) -> &NativeRef {
        &self.target
    }

    /// Static type this adapter was built for
    pub fn static_type(&self) -> NativeClass {
        self.static_type
    }

    /// Declared member table, if the static type is registered
    pub fn declared_members(&self) -> Option<&Arc<NativeClassInfo>> {
        self.members.as_ref()
    }

    fn bind_method(&self, name: &str, overloads: Arc<[MethodOverload]>) -> NativeFunction {
        let target = self.target.clone();
        let scope = self.scope.clone();
        let method = name.to_string();
        NativeFunction::new(name, move |args| {
            let overload = select_overload(&method, &overloads, args.len())?;
            let result = overload.invoke(target.as_ref(), args)?;
            Ok(wrap_in(&scope, result))
        })
    }
}

impl fmt::Debug for ReflectiveAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectiveAdapter")
            .field("static_type", &self.static_type)
            .field("declared", &self.members.is_some())
            .finish()
    }
}

/// Wrap through the scope if it is still alive.
pub(crate) fn wrap_in(scope: &Weak<dyn Scope>, value: Value) -> Value {
    match scope.upgrade() {
        Some(scope) => scope.wrap(value),
        None => value,
    }
}
