//! Declared member tables for native classes
//!
//! A `NativeClassInfo` describes the members visible through one declared
//! (static) class: named properties and methods, each method with one or more
//! overloads. Tables are built once when a bridge type or imported class is
//! registered and shared by every adapter using that static type.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{NativeError, NativeResult};
use crate::object::{downcast, NativeClass, NativeObject};
use crate::value::Value;

/// Erased property getter
pub type PropertyGetter = Arc<dyn Fn(&dyn NativeObject) -> NativeResult<Value> + Send + Sync>;

/// Erased method body
pub type MethodBody = Arc<dyn Fn(&dyn NativeObject, &[Value]) -> NativeResult<Value> + Send + Sync>;

/// One overload of a declared method
#[derive(Clone)]
pub struct MethodOverload {
    /// Exact argument count, or `None` for variadic
    pub arity: Option<usize>,
    body: MethodBody,
}

impl MethodOverload {
    /// Invoke this overload on a target
    pub fn invoke(&self, target: &dyn NativeObject, args: &[Value]) -> NativeResult<Value> {
        (self.body)(target, args)
    }
}

/// A declared member of a native class
#[derive(Clone)]
pub enum NativeMember {
    /// Readable property
    Property(PropertyGetter),
    /// Method with its overloads in declaration order
    Method(Arc<[MethodOverload]>),
}

impl NativeMember {
    /// Check if this member is a method
    pub fn is_method(&self) -> bool {
        matches!(self, NativeMember::Method(_))
    }
}

/// Pick the overload for `argc` arguments.
///
/// The first overload with an exact arity match wins; otherwise the first
/// variadic overload is used.
pub fn select_overload<'a>(
    name: &str,
    overloads: &'a [MethodOverload],
    argc: usize,
) -> NativeResult<&'a MethodOverload> {
    overloads
        .iter()
        .find(|o| o.arity == Some(argc))
        .or_else(|| overloads.iter().find(|o| o.arity.is_none()))
        .ok_or_else(|| NativeError::NoMatchingOverload {
            name: name.to_string(),
            argc,
        })
}

/// Builder for constructing NativeClassInfo instances.
pub struct NativeClassInfoBuilder {
    class: NativeClass,
    members: FxHashMap<String, NativeMember>,
    methods: FxHashMap<String, Vec<MethodOverload>>,
}

impl NativeClassInfoBuilder {
    /// Add a property with an erased getter
    pub fn property(
        mut self,
        name: &str,
        getter: impl Fn(&dyn NativeObject) -> NativeResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.methods.remove(name);
        self.members
            .insert(name.to_string(), NativeMember::Property(Arc::new(getter)));
        self
    }

    /// Add a method overload with an erased body
    pub fn method(
        mut self,
        name: &str,
        arity: Option<usize>,
        body: impl Fn(&dyn NativeObject, &[Value]) -> NativeResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.members.remove(name);
        self.methods
            .entry(name.to_string())
            .or_default()
            .push(MethodOverload {
                arity,
                body: Arc::new(body),
            });
        self
    }

    /// Add a property whose getter works on the concrete type `T`
    pub fn typed_property<T: NativeObject>(
        self,
        name: &str,
        getter: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.property(name, move |target| Ok(getter(expect_type::<T>(target)?)))
    }

    /// Add a method overload whose body works on the concrete type `T`
    pub fn typed_method<T: NativeObject>(
        self,
        name: &str,
        arity: Option<usize>,
        body: impl Fn(&T, &[Value]) -> NativeResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.method(name, arity, move |target, args| {
            body(expect_type::<T>(target)?, args)
        })
    }

    /// Build the NativeClassInfo
    pub fn build(self) -> NativeClassInfo {
        let mut members = self.members;
        for (name, overloads) in self.methods {
            members.insert(name, NativeMember::Method(overloads.into()));
        }
        NativeClassInfo {
            class: self.class,
            members,
        }
    }
}

fn expect_type<T: NativeObject>(target: &dyn NativeObject) -> NativeResult<&T> {
    downcast::<T>(target).ok_or_else(|| NativeError::TypeMismatch {
        expected: std::any::type_name::<T>().to_string(),
        got: target.native_class().name().to_string(),
    })
}

/// Declared member table of one native class.
///
/// Build once per class (via `builder`), reuse for all instances.
pub struct NativeClassInfo {
    class: NativeClass,
    members: FxHashMap<String, NativeMember>,
}

impl NativeClassInfo {
    /// Create a builder for the given class
    pub fn builder(class: NativeClass) -> NativeClassInfoBuilder {
        NativeClassInfoBuilder {
            class,
            members: FxHashMap::default(),
            methods: FxHashMap::default(),
        }
    }

    /// Class this table describes
    pub fn class(&self) -> NativeClass {
        self.class
    }

    /// Look up a member by name
    pub fn member(&self, name: &str) -> Option<&NativeMember> {
        self.members.get(name)
    }

    /// Check if a member is declared
    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Declared member names, sorted
    pub fn member_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.members.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of declared members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl fmt::Debug for NativeClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeClassInfo")
            .field("class", &self.class)
            .field("members", &self.member_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    struct Counter {
        count: i64,
    }

    impl NativeObject for Counter {
        fn native_class(&self) -> NativeClass {
            NativeClass::of::<Counter>()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Other;

    impl NativeObject for Other {
        fn native_class(&self) -> NativeClass {
            NativeClass::of::<Other>()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn counter_info() -> NativeClassInfo {
        NativeClassInfo::builder(NativeClass::of::<Counter>())
            .typed_property::<Counter>("count", |c| Value::Int(c.count))
            .typed_method::<Counter>("add", Some(1), |c, args| {
                let n = args[0].as_int().ok_or("add expects an int")?;
                Ok(Value::Int(c.count + n))
            })
            .typed_method::<Counter>("add", Some(2), |c, args| {
                let a = args[0].as_int().unwrap_or(0);
                let b = args[1].as_int().unwrap_or(0);
                Ok(Value::Int(c.count + a + b))
            })
            .typed_method::<Counter>("describe", None, |c, args| {
                Ok(Value::from(format!("{}:{}", c.count, args.len())))
            })
            .build()
    }

    #[test]
    fn test_member_names_sorted() {
        let info = counter_info();
        assert_eq!(info.member_names(), vec!["add", "count", "describe"]);
        assert_eq!(info.member_count(), 3);
    }

    #[test]
    fn test_property_getter() {
        let info = counter_info();
        let target = Counter { count: 5 };
        match info.member("count") {
            Some(NativeMember::Property(get)) => assert_eq!(get(&target).unwrap(), Value::Int(5)),
            _ => panic!("count should be a property"),
        }
    }

    #[test]
    fn test_overload_by_arity() {
        let info = counter_info();
        let target = Counter { count: 1 };
        let Some(NativeMember::Method(overloads)) = info.member("add") else {
            panic!("add should be a method");
        };
        let one = select_overload("add", overloads, 1).unwrap();
        assert_eq!(one.invoke(&target, &[Value::Int(2)]).unwrap(), Value::Int(3));
        let two = select_overload("add", overloads, 2).unwrap();
        assert_eq!(
            two.invoke(&target, &[Value::Int(2), Value::Int(3)]).unwrap(),
            Value::Int(6)
        );
        assert!(matches!(
            select_overload("add", overloads, 0),
            Err(NativeError::NoMatchingOverload { argc: 0, .. })
        ));
    }

    #[test]
    fn test_variadic_fallback() {
        let info = counter_info();
        let Some(NativeMember::Method(overloads)) = info.member("describe") else {
            panic!("describe should be a method");
        };
        let chosen = select_overload("describe", overloads, 3).unwrap();
        let out = chosen
            .invoke(&Counter { count: 9 }, &[Value::Null, Value::Null, Value::Null])
            .unwrap();
        assert_eq!(out, Value::from("9:3"));
    }

    #[test]
    fn test_typed_member_on_wrong_type() {
        let info = counter_info();
        let Some(NativeMember::Property(get)) = info.member("count") else {
            panic!("count should be a property");
        };
        assert!(matches!(get(&Other), Err(NativeError::TypeMismatch { .. })));
    }

    #[test]
    fn test_later_kind_replaces_earlier() {
        let info = NativeClassInfo::builder(NativeClass::of::<Counter>())
            .typed_property::<Counter>("size", |c| Value::Int(c.count))
            .typed_method::<Counter>("size", Some(0), |c, _| Ok(Value::Int(c.count)))
            .build();
        assert!(info.member("size").unwrap().is_method());
    }
}
