use std::any::Any;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hostbridge_engine::sdk::{
    native_ref, NativeClass, NativeClassInfo, NativeError, NativeObject, NativeRef, Scope,
    Scriptable, Value,
};
use hostbridge_engine::{
    BridgeType, HostObject, HostObjectType, NativeBridge, OverrideTable, RootScope, WrappedClasses,
};

struct Point {
    x: i64,
    y: i64,
}

impl NativeObject for Point {
    fn native_class(&self) -> NativeClass {
        NativeClass::of::<Point>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        (name == "dynamic").then_some(Value::Bool(true))
    }
}

struct PointObject {
    point: NativeRef,
}

impl BridgeType for PointObject {
    const CLASS_NAME: &'static str = "Point";

    fn wrapped_object(&self) -> Option<NativeRef> {
        Some(self.point.clone())
    }

    fn static_type(&self) -> NativeClass {
        NativeClass::of::<Point>()
    }

    fn overrides() -> OverrideTable<Self> {
        OverrideTable::builder()
            .property("kind", |_| Some(Value::from("point")))
            .build()
    }
}

impl HostObjectType for PointObject {
    fn from_native(native: NativeRef) -> Result<Self, NativeError> {
        Ok(Self { point: native })
    }

    fn wrapped_classes() -> Result<WrappedClasses, NativeError> {
        Ok(WrappedClasses::Multi(vec![NativeClass::of::<Point>()]))
    }

    fn native_types() -> Vec<NativeClassInfo> {
        vec![NativeClassInfo::builder(NativeClass::of::<Point>())
            .typed_property::<Point>("x", |p| Value::Int(p.x))
            .typed_property::<Point>("y", |p| Value::Int(p.y))
            .typed_method::<Point>("norm1", Some(0), |p, _| Ok(Value::Int(p.x.abs() + p.y.abs())))
            .build()]
    }
}

fn setup() -> (Arc<RootScope>, Arc<dyn Scope>) {
    let scope = RootScope::new();
    scope.install_host_objects(&[HostObject::<PointObject>::class()]);
    let handle = scope.as_scope();
    (scope, handle)
}

fn bench_resolve(c: &mut Criterion) {
    let (_scope, handle) = setup();
    let bridge = NativeBridge::new(PointObject {
        point: native_ref(Point { x: 3, y: -4 }),
    });
    // Build the adapter outside the measurement
    bridge.get("x", &handle);

    let mut group = c.benchmark_group("resolve");
    for name in ["kind", "x", "norm1", "dynamic", "missing"] {
        group.bench_with_input(BenchmarkId::new("member", name), &name, |b, name| {
            b.iter(|| bridge.get(black_box(name), &handle));
        });
    }
    group.finish();
}

fn bench_first_access(c: &mut Criterion) {
    let (_scope, handle) = setup();

    c.bench_function("first_access", |b| {
        b.iter(|| {
            let bridge = NativeBridge::new(PointObject {
                point: native_ref(Point { x: 1, y: 2 }),
            });
            bridge.get(black_box("x"), &handle)
        });
    });
}

fn bench_wrap(c: &mut Criterion) {
    let (scope, _handle) = setup();
    let point = native_ref(Point { x: 1, y: 2 });

    c.bench_function("wrap_native", |b| {
        b.iter(|| scope.wrap(Value::Native(black_box(point.clone()))));
    });
}

criterion_group!(benches, bench_resolve, bench_first_access, bench_wrap);
criterion_main!(benches);
