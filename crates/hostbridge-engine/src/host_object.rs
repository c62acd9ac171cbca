//! Host object classes
//!
//! A host object class is a bridge type that can be installed into a root
//! scope. It may declare the native classes it wraps; every value of those
//! classes crossing into script space is then wrapped by it.

use std::marker::PhantomData;
use std::sync::Arc;

use hostbridge_sdk::{NativeClass, NativeClassInfo, NativeError, NativeRef, Scriptable};

use crate::bridge::{BridgeType, NativeBridge, OverrideTable};

/// Native classes a host object type wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrappedClasses {
    /// Only the host object's own class
    Own,
    /// Every listed class
    Multi(Vec<NativeClass>),
}

/// A bridge type installable as a host object.
pub trait HostObjectType: BridgeType {
    /// Construct a bridge value around a native object
    fn from_native(native: NativeRef) -> Result<Self, NativeError>;

    /// Native classes this type wraps
    fn wrapped_classes() -> Result<WrappedClasses, NativeError> {
        Ok(WrappedClasses::Own)
    }

    /// Member tables to register along with this type
    fn native_types() -> Vec<NativeClassInfo> {
        Vec::new()
    }
}

/// Object-safe descriptor of a host object type.
pub trait HostObjectClass: Send + Sync {
    /// Script-visible class name
    fn class_name(&self) -> &str;

    /// Class identity of the host object type itself
    fn own_class(&self) -> NativeClass;

    /// Native classes this host object wraps
    fn wrapped_classes(&self) -> Result<WrappedClasses, NativeError>;

    /// Member tables to register
    fn native_types(&self) -> Vec<NativeClassInfo>;

    /// Names the type overrides
    fn override_names(&self) -> Vec<String>;

    /// Wrap a native object
    fn wrap(&self, native: NativeRef) -> Result<Arc<dyn Scriptable>, NativeError>;
}

/// Descriptor for a concrete [`HostObjectType`].
pub struct HostObject<T>(PhantomData<fn() -> T>);

impl<T: HostObjectType> HostObject<T> {
    /// Descriptor for `T`
    pub fn class() -> Arc<dyn HostObjectClass> {
        Arc::new(HostObject::<T>(PhantomData))
    }
}

impl<T: HostObjectType> HostObjectClass for HostObject<T> {
    fn class_name(&self) -> &str {
        T::CLASS_NAME
    }

    fn own_class(&self) -> NativeClass {
        NativeClass::named::<T>(T::CLASS_NAME)
    }

    fn wrapped_classes(&self) -> Result<WrappedClasses, NativeError> {
        T::wrapped_classes()
    }

    fn native_types(&self) -> Vec<NativeClassInfo> {
        T::native_types()
    }

    fn override_names(&self) -> Vec<String> {
        OverrideTable::<T>::shared()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn wrap(&self, native: NativeRef) -> Result<Arc<dyn Scriptable>, NativeError> {
        let bridge: Arc<dyn Scriptable> = NativeBridge::new(T::from_native(native)?);
        Ok(bridge)
    }
}

/// Source of host objects and imports for the root scope.
pub trait HostObjectProvider: Send + Sync {
    /// Host object classes to install
    fn host_object_classes(&self) -> Vec<Arc<dyn HostObjectClass>>;

    /// Native classes made visible by short name
    fn imported_classes(&self) -> Vec<Arc<NativeClassInfo>> {
        Vec::new()
    }

    /// Package prefixes made visible
    fn imported_packages(&self) -> Vec<String> {
        Vec::new()
    }
}
