//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use hostbridge_engine::sdk::{
    downcast, NativeClass, NativeClassInfo, NativeError, NativeObject, NativeRef, Value,
};
use hostbridge_engine::{BridgeType, HostObjectType, OverrideTable, WrappedClasses};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ===== Property map =====

/// Native string-keyed map; entries are its dynamic properties
pub struct PropertyMap {
    entries: BTreeMap<String, Value>,
}

impl PropertyMap {
    pub fn new(entries: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn class_info() -> NativeClassInfo {
        NativeClassInfo::builder(NativeClass::of::<PropertyMap>())
            .typed_method::<PropertyMap>("size", Some(0), |m, _| Ok(Value::from(m.len())))
            .typed_method::<PropertyMap>("containsKey", Some(1), |m, args| {
                let key = args[0].as_str().unwrap_or_default();
                Ok(Value::Bool(m.entries.contains_key(key)))
            })
            .build()
    }
}

impl NativeObject for PropertyMap {
    fn native_class(&self) -> NativeClass {
        NativeClass::of::<PropertyMap>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        self.entries.get(name).cloned()
    }
}

pub struct MapObject {
    map: NativeRef,
}

impl BridgeType for MapObject {
    const CLASS_NAME: &'static str = "PropertyMap";

    fn wrapped_object(&self) -> Option<NativeRef> {
        Some(self.map.clone())
    }

    fn static_type(&self) -> NativeClass {
        NativeClass::of::<PropertyMap>()
    }
}

impl HostObjectType for MapObject {
    fn from_native(native: NativeRef) -> Result<Self, NativeError> {
        expect_class::<PropertyMap>(&native, "PropertyMap")?;
        Ok(Self { map: native })
    }

    fn wrapped_classes() -> Result<WrappedClasses, NativeError> {
        Ok(WrappedClasses::Multi(vec![NativeClass::of::<PropertyMap>()]))
    }

    fn native_types() -> Vec<NativeClassInfo> {
        vec![PropertyMap::class_info()]
    }
}

// ===== Resources =====

/// A content resource with a path and a type
pub struct Resource {
    pub path: String,
    pub resource_type: String,
    pub super_type: Option<String>,
}

impl Resource {
    pub fn new(path: &str, resource_type: &str) -> Self {
        Self {
            path: path.to_string(),
            resource_type: resource_type.to_string(),
            super_type: Some("base/component".to_string()),
        }
    }

    pub fn class_info() -> NativeClassInfo {
        NativeClassInfo::builder(NativeClass::of::<Resource>())
            .typed_property::<Resource>("path", |r| Value::from(r.path.as_str()))
            .typed_property::<Resource>("resourceType", |r| {
                Value::from(r.resource_type.as_str())
            })
            .typed_property::<Resource>("resourceSuperType", |r| {
                r.super_type.as_deref().map(Value::from).unwrap_or_default()
            })
            .typed_method::<Resource>("isResourceType", Some(1), |r, args| {
                Ok(Value::Bool(args[0].as_str() == Some(r.resource_type.as_str())))
            })
            .typed_method::<Resource>("child", Some(1), |r, args| {
                let name = args[0].as_str().ok_or_else(|| NativeError::TypeMismatch {
                    expected: "string".to_string(),
                    got: args[0].type_name().to_string(),
                })?;
                let child = Resource::new(&format!("{}/{}", r.path, name), "nt:unstructured");
                Ok(Value::Native(Arc::new(child)))
            })
            .build()
    }
}

impl NativeObject for Resource {
    fn native_class(&self) -> NativeClass {
        NativeClass::of::<Resource>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A resource that exists only as a placeholder
pub struct SyntheticResource {
    pub path: String,
}

impl NativeObject for SyntheticResource {
    fn native_class(&self) -> NativeClass {
        NativeClass::of::<SyntheticResource>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        (name == "synthetic").then_some(Value::Bool(true))
    }
}

/// Resource bridge answering `path`, `name` and `resourceSuperType` itself
pub struct ResourceObject {
    resource: Option<NativeRef>,
}

impl ResourceObject {
    pub fn detached() -> Self {
        Self { resource: None }
    }

    fn path(&self) -> Option<String> {
        let native = self.resource.as_ref()?;
        if let Some(r) = downcast::<Resource>(native.as_ref()) {
            return Some(r.path.clone());
        }
        downcast::<SyntheticResource>(native.as_ref()).map(|r| r.path.clone())
    }
}

impl BridgeType for ResourceObject {
    const CLASS_NAME: &'static str = "Resource";

    fn wrapped_object(&self) -> Option<NativeRef> {
        self.resource.clone()
    }

    fn static_type(&self) -> NativeClass {
        self.resource
            .as_ref()
            .map(|r| r.native_class())
            .unwrap_or_else(NativeClass::of::<Resource>)
    }

    fn overrides() -> OverrideTable<Self> {
        OverrideTable::builder()
            .property("path", |r: &ResourceObject| r.path().map(Value::from))
            .property("name", |r: &ResourceObject| {
                let path = r.path()?;
                let name = path.rsplit('/').next().unwrap_or_default().to_string();
                Some(Value::from(name))
            })
            .property("resourceSuperType", |_| None)
            .method("toString", |r: &ResourceObject, _| {
                Ok(Value::from(format!("Resource {}", r.path().unwrap_or_default())))
            })
            .build()
    }
}

impl HostObjectType for ResourceObject {
    fn from_native(native: NativeRef) -> Result<Self, NativeError> {
        Ok(Self {
            resource: Some(native),
        })
    }

    fn wrapped_classes() -> Result<WrappedClasses, NativeError> {
        Ok(WrappedClasses::Multi(vec![
            NativeClass::of::<Resource>(),
            NativeClass::of::<SyntheticResource>(),
        ]))
    }

    fn native_types() -> Vec<NativeClassInfo> {
        vec![Resource::class_info()]
    }
}

// ===== Host object that cannot be prepared =====

pub struct BrokenObject;

impl BridgeType for BrokenObject {
    const CLASS_NAME: &'static str = "Broken";

    fn wrapped_object(&self) -> Option<NativeRef> {
        None
    }

    fn static_type(&self) -> NativeClass {
        NativeClass::of::<BrokenObject>()
    }
}

impl HostObjectType for BrokenObject {
    fn from_native(_native: NativeRef) -> Result<Self, NativeError> {
        Ok(BrokenObject)
    }

    fn wrapped_classes() -> Result<WrappedClasses, NativeError> {
        Err(NativeError::Native("prototype construction failed".to_string()))
    }
}

fn expect_class<T: NativeObject>(native: &NativeRef, expected: &str) -> Result<(), NativeError> {
    if native.native_class() == NativeClass::of::<T>() {
        Ok(())
    } else {
        Err(NativeError::TypeMismatch {
            expected: expected.to_string(),
            got: native.native_class().name().to_string(),
        })
    }
}
