//! Hostbridge SDK - contract between native objects and the script runtime
//!
//! This crate provides the minimal types and traits needed to expose native
//! objects to scripts without depending on the bridging engine:
//!
//! - [`Value`] / [`NativeFunction`]: what crosses the script boundary
//! - [`NativeObject`] / [`NativeClass`]: the capability native types implement
//! - [`NativeClassInfo`]: declared members of a static type, built once
//! - [`Scriptable`] / [`Scope`]: the member resolution hook the runtime calls
//!
//! # Example
//!
//! ```ignore
//! use hostbridge_sdk::{NativeClass, NativeClassInfo, NativeObject, Value};
//!
//! struct Counter { count: i64 }
//!
//! impl NativeObject for Counter {
//!     fn native_class(&self) -> NativeClass { NativeClass::of::<Counter>() }
//!     fn as_any(&self) -> &dyn std::any::Any { self }
//! }
//!
//! let info = NativeClassInfo::builder(NativeClass::of::<Counter>())
//!     .typed_property::<Counter>("count", |c| Value::Int(c.count))
//!     .build();
//! ```

#![warn(missing_docs)]

pub mod class_info;
pub mod error;
pub mod object;
pub mod scriptable;
pub mod value;

pub use class_info::{
    select_overload, MethodBody, MethodOverload, NativeClassInfo, NativeClassInfoBuilder,
    NativeMember, PropertyGetter,
};
pub use error::{NativeError, NativeResult};
pub use object::{downcast, native_ref, NativeClass, NativeObject, NativeRef};
pub use scriptable::{Scope, Scriptable};
pub use value::{NativeFn, NativeFunction, Value};
