//! Member Resolution Tests
//!
//! Tests for how bridged native objects resolve members:
//! - Dynamic properties of a wrapped map
//! - Overrides answering before the reflective adapter
//! - Declared members of the static type
//! - Objects with no wrapped value
//! - Adapter construction under concurrent first access
//!
//! # Running Tests
//! ```bash
//! cargo test --test bridge_resolution
//! ```

mod common;

use std::any::Any;
use std::sync::{Arc, Barrier};

use common::{init_logging, MapObject, PropertyMap, Resource, ResourceObject, SyntheticResource};
use hostbridge_engine::sdk::{
    native_ref, NativeClass, NativeClassInfo, NativeError, NativeObject, NativeRef, Scope,
    Scriptable, Value,
};
use hostbridge_engine::{
    BridgeType, HostObject, HostObjectType, NativeBridge, ReflectiveAdapter, RootScope,
    WrappedClasses,
};

fn scope_with_fixtures() -> Arc<RootScope> {
    init_logging();
    let scope = RootScope::new();
    let report = scope.install_host_objects(&[
        HostObject::<MapObject>::class(),
        HostObject::<ResourceObject>::class(),
    ]);
    assert!(report.is_complete());
    scope
}

fn wrap(scope: &Arc<RootScope>, native: NativeRef) -> Arc<dyn Scriptable> {
    match scope.wrap(Value::Native(native)) {
        Value::Object(object) => object,
        other => panic!("expected a wrapped object, got {:?}", other),
    }
}

// ===== Map Tests =====

#[test]
fn test_map_entries_resolve() {
    let scope = scope_with_fixtures();
    let handle = scope.as_scope();
    let map = wrap(
        &scope,
        native_ref(PropertyMap::new([("a", Value::from("a")), ("b", Value::from(1))])),
    );

    assert_eq!(map.class_name(), "PropertyMap");
    assert_eq!(map.get("a", &handle), Some(Value::from("a")));
    assert_eq!(map.get("b", &handle), Some(Value::Int(1)));
    assert_eq!(map.get("c", &handle), None);
    assert!(!map.has("c", &handle));
}

#[test]
fn test_map_declared_methods() {
    let scope = scope_with_fixtures();
    let handle = scope.as_scope();
    let map = wrap(
        &scope,
        native_ref(PropertyMap::new([("a", Value::from("a")), ("b", Value::from(1))])),
    );

    assert_eq!(map.invoke("size", &[], &handle), Ok(Value::Int(2)));
    assert_eq!(
        map.invoke("containsKey", &[Value::from("b")], &handle),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        map.invoke("size", &[Value::Null], &handle),
        Err(NativeError::NoMatchingOverload {
            name: "size".to_string(),
            argc: 1
        })
    );
}

// ===== Override Tests =====

#[test]
fn test_override_answers_before_declared_member() {
    let scope = scope_with_fixtures();
    let handle = scope.as_scope();
    let resource = wrap(&scope, native_ref(Resource::new("/content/site/page", "site/page")));

    assert_eq!(resource.get("path", &handle), Some(Value::from("/content/site/page")));
    assert_eq!(resource.get("name", &handle), Some(Value::from("page")));
    assert_eq!(resource.get("resourceType", &handle), Some(Value::from("site/page")));
}

#[test]
fn test_override_miss_does_not_fall_through() {
    let scope = scope_with_fixtures();
    let handle = scope.as_scope();
    let resource = wrap(&scope, native_ref(Resource::new("/content/a", "site/page")));

    // Declared on the native type, but the override reports not found
    assert_eq!(resource.get("resourceSuperType", &handle), None);
}

#[test]
fn test_method_override() {
    let scope = scope_with_fixtures();
    let handle = scope.as_scope();
    let resource = wrap(&scope, native_ref(Resource::new("/content/a", "site/page")));

    assert_eq!(
        resource.invoke("toString", &[], &handle),
        Ok(Value::from("Resource /content/a"))
    );
    assert_eq!(
        resource.invoke("path", &[], &handle),
        Err(NativeError::NotCallable("path".to_string()))
    );
    assert_eq!(
        resource.invoke("missing", &[], &handle),
        Err(NativeError::MemberNotFound("missing".to_string()))
    );
}

#[test]
fn test_override_names_include_every_entry() {
    let class = HostObject::<ResourceObject>::class();
    assert_eq!(
        class.override_names(),
        vec!["name", "path", "resourceSuperType", "toString"]
    );
}

// ===== Declared Member Tests =====

#[test]
fn test_method_results_are_wrapped() {
    let scope = scope_with_fixtures();
    let handle = scope.as_scope();
    let resource = wrap(&scope, native_ref(Resource::new("/content/a", "site/page")));

    let child = resource
        .invoke("child", &[Value::from("jcr:content")], &handle)
        .unwrap();
    let child = child.as_object().expect("child should be wrapped");
    assert_eq!(child.class_name(), "Resource");
    assert_eq!(child.get("path", &handle), Some(Value::from("/content/a/jcr:content")));
    assert_eq!(
        resource.invoke("isResourceType", &[Value::from("site/page")], &handle),
        Ok(Value::Bool(true))
    );
}

#[test]
fn test_unregistered_static_type_exposes_dynamic_only() {
    let scope = scope_with_fixtures();
    let handle = scope.as_scope();
    let synthetic = wrap(
        &scope,
        native_ref(SyntheticResource {
            path: "/content/missing".to_string(),
        }),
    );

    assert_eq!(synthetic.class_name(), "Resource");
    assert_eq!(synthetic.get("synthetic", &handle), Some(Value::Bool(true)));
    assert_eq!(synthetic.get("resourceType", &handle), None);
    assert_eq!(synthetic.get("path", &handle), Some(Value::from("/content/missing")));
}

// ===== Static Type Tests =====

trait Titled: Send + Sync {
    fn title(&self) -> &str;
}

struct Document {
    title: String,
    owner: String,
}

impl Titled for Document {
    fn title(&self) -> &str {
        &self.title
    }
}

impl NativeObject for Document {
    fn native_class(&self) -> NativeClass {
        NativeClass::of::<Document>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Bridges documents through the narrower `Titled` view.
struct TitledObject {
    document: NativeRef,
}

impl BridgeType for TitledObject {
    const CLASS_NAME: &'static str = "Titled";

    fn wrapped_object(&self) -> Option<NativeRef> {
        Some(self.document.clone())
    }

    fn static_type(&self) -> NativeClass {
        NativeClass::of::<dyn Titled>()
    }
}

impl HostObjectType for TitledObject {
    fn from_native(native: NativeRef) -> Result<Self, NativeError> {
        Ok(Self { document: native })
    }

    fn wrapped_classes() -> Result<WrappedClasses, NativeError> {
        Ok(WrappedClasses::Multi(vec![NativeClass::of::<Document>()]))
    }

    fn native_types() -> Vec<NativeClassInfo> {
        vec![
            NativeClassInfo::builder(NativeClass::of::<dyn Titled>())
                .typed_property::<Document>("title", |d| Value::from(d.title()))
                .build(),
            NativeClassInfo::builder(NativeClass::of::<Document>())
                .typed_property::<Document>("title", |d| Value::from(d.title()))
                .typed_property::<Document>("owner", |d| Value::from(d.owner.as_str()))
                .typed_method::<Document>("describe", Some(0), |d, _| {
                    Ok(Value::from(format!("{} by {}", d.title, d.owner)))
                })
                .build(),
        ]
    }
}

#[test]
fn test_declared_type_limits_members() {
    init_logging();
    let scope = RootScope::new();
    assert!(scope
        .install_host_objects(&[HostObject::<TitledObject>::class()])
        .is_complete());
    let handle = scope.as_scope();
    let document = native_ref(Document {
        title: "Notes".to_string(),
        owner: "ops".to_string(),
    });

    let titled = wrap(&scope, document.clone());
    assert_eq!(titled.class_name(), "Titled");
    assert_eq!(titled.get("title", &handle), Some(Value::from("Notes")));
    assert_eq!(titled.get("owner", &handle), None);
    assert!(!titled.has("describe", &handle));
    assert_eq!(
        titled.invoke("describe", &[], &handle),
        Err(NativeError::MemberNotFound("describe".to_string()))
    );

    // The same object seen through its runtime class
    let raw = ReflectiveAdapter::new(&handle, document.clone(), document.native_class());
    assert_eq!(raw.get("owner"), Some(Value::from("ops")));
    assert_eq!(raw.get("title"), Some(Value::from("Notes")));
    match raw.get("describe") {
        Some(Value::Function(describe)) => {
            assert_eq!(describe.call(&[]), Ok(Value::from("Notes by ops")))
        }
        other => panic!("expected a bound method, got {:?}", other),
    }
}

// ===== Detached Object Tests =====

#[test]
fn test_no_wrapped_object_resolves_nothing() {
    let scope = scope_with_fixtures();
    let handle = scope.as_scope();
    let bridge = NativeBridge::new(ResourceObject::detached());

    for name in ["path", "name", "toString", "resourceType", "anything"] {
        assert_eq!(bridge.get(name, &handle), None, "{} should not resolve", name);
    }
    assert!(bridge.adapter().is_none());
}

// ===== Concurrency Tests =====

#[test]
fn test_adapter_shared_across_threads() {
    let scope = scope_with_fixtures();
    let native = native_ref(Resource::new("/content/a", "site/page"));
    let bridge = NativeBridge::new(ResourceObject::from_native(native).unwrap());

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let bridge = bridge.clone();
            let barrier = barrier.clone();
            let handle: Arc<dyn Scope> = scope.as_scope();
            std::thread::spawn(move || {
                barrier.wait();
                let value = bridge.get("resourceType", &handle);
                (value, bridge.adapter().cloned())
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = results[0].1.clone().unwrap();
    for (value, adapter) in results {
        assert_eq!(value, Some(Value::from("site/page")));
        assert!(Arc::ptr_eq(&first, &adapter.unwrap()));
    }
}
