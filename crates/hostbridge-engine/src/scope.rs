//! Root scope: installed host objects, wrappers and imports

use std::fmt;
use std::sync::Arc;

use hostbridge_sdk::{NativeClass, NativeClassInfo, NativeError, NativeRef, Scope, Scriptable, Value};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::RegistrationError;
use crate::host_object::{HostObjectClass, WrappedClasses};
use crate::registry::{ClassInfoRegistry, WrapperRegistry};

/// Outcome of installing a batch of host object classes.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Installed class names, in input order
    pub installed: Vec<String>,
    /// Classes that could not be prepared
    pub skipped: Vec<RegistrationError>,
}

impl InstallReport {
    /// Check if every class was installed
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// The shared top-level scope scripts run in.
#[derive(Default)]
pub struct RootScope {
    host_objects: RwLock<FxHashMap<String, Arc<dyn HostObjectClass>>>,
    wrappers: WrapperRegistry,
    classes: ClassInfoRegistry,
    imported_classes: RwLock<FxHashMap<String, NativeClass>>,
    imported_packages: RwLock<Vec<String>>,
}

impl RootScope {
    /// Create an empty scope
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// This scope as a resolution scope
    pub fn as_scope(self: &Arc<Self>) -> Arc<dyn Scope> {
        self.clone()
    }

    /// Install host object classes.
    ///
    /// A class whose wrapped classes cannot be read is logged and skipped;
    /// the rest of the batch is still installed.
    pub fn install_host_objects(&self, classes: &[Arc<dyn HostObjectClass>]) -> InstallReport {
        let mut report = InstallReport::default();
        for class in classes {
            match self.install_one(class) {
                Ok(()) => report.installed.push(class.class_name().to_string()),
                Err(e) => {
                    log::warn!("{}", e);
                    report.skipped.push(e);
                }
            }
        }
        report
    }

    fn install_one(&self, class: &Arc<dyn HostObjectClass>) -> Result<(), RegistrationError> {
        let name = class.class_name();
        if name.is_empty() {
            return Err(RegistrationError::EmptyClassName);
        }
        let wrapped = class
            .wrapped_classes()
            .map_err(|source| RegistrationError::Prepare {
                class: name.to_string(),
                source,
            })?;

        let previous = self
            .host_objects
            .write()
            .insert(name.to_string(), class.clone());
        if previous.is_some() {
            log::debug!("host object {} redefined", name);
        }

        for info in class.native_types() {
            self.classes.register(Arc::new(info));
        }

        match wrapped {
            WrappedClasses::Own => {
                self.wrappers.register(class.own_class(), name);
            }
            WrappedClasses::Multi(natives) => {
                for native in natives {
                    self.wrappers.register(native, name);
                }
            }
        }
        log::debug!("installed host object {}", name);
        Ok(())
    }

    /// Make native classes visible by short name
    pub fn import_classes(&self, infos: &[Arc<NativeClassInfo>]) {
        let mut imports = self.imported_classes.write();
        for info in infos {
            let class = info.class();
            imports.insert(class.name().to_string(), class);
            self.classes.register(info.clone());
        }
    }

    /// Make package prefixes visible
    pub fn import_packages(&self, packages: &[String]) {
        let mut imported = self.imported_packages.write();
        for package in packages {
            if !imported.contains(package) {
                imported.push(package.clone());
            }
        }
    }

    /// Class imported under `short_name`
    pub fn lookup_import(&self, short_name: &str) -> Option<NativeClass> {
        self.imported_classes.read().get(short_name).copied()
    }

    /// Check if a package prefix was imported
    pub fn is_package_imported(&self, package: &str) -> bool {
        self.imported_packages.read().iter().any(|p| p == package)
    }

    /// Imported package prefixes in import order
    pub fn imported_packages(&self) -> Vec<String> {
        self.imported_packages.read().clone()
    }

    /// Installed host object class by name
    pub fn host_object(&self, name: &str) -> Option<Arc<dyn HostObjectClass>> {
        self.host_objects.read().get(name).cloned()
    }

    /// Installed host object names, sorted
    pub fn host_object_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.host_objects.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Native class to host object mapping
    pub fn wrappers(&self) -> &WrapperRegistry {
        &self.wrappers
    }

    /// Declared member tables
    pub fn classes(&self) -> &ClassInfoRegistry {
        &self.classes
    }

    /// Construct a host object of class `class_name` around `native`
    pub fn construct(
        &self,
        class_name: &str,
        native: NativeRef,
    ) -> Result<Arc<dyn Scriptable>, NativeError> {
        let class = self
            .host_object(class_name)
            .ok_or_else(|| NativeError::MemberNotFound(class_name.to_string()))?;
        class.wrap(native)
    }

    /// Wrap a native value with its registered host object, if any
    pub fn wrap_native(&self, native: NativeRef) -> Value {
        let class = native.native_class();
        let Some(bridge) = self.wrappers.lookup(&class) else {
            return Value::Native(native);
        };
        let Some(host) = self.host_object(&bridge) else {
            return Value::Native(native);
        };
        match host.wrap(native.clone()) {
            Ok(object) => Value::Object(object),
            Err(e) => {
                log::warn!("cannot wrap {} with {}: {}", class, bridge, e);
                Value::Native(native)
            }
        }
    }
}

impl Scope for RootScope {
    fn class_info(&self, class: &NativeClass) -> Option<Arc<NativeClassInfo>> {
        self.classes.get(class)
    }

    fn wrap(&self, value: Value) -> Value {
        match value {
            Value::Native(native) => self.wrap_native(native),
            other => other,
        }
    }
}

impl fmt::Debug for RootScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootScope")
            .field("host_objects", &self.host_object_names())
            .field("wrappers", &self.wrappers.len())
            .field("classes", &self.classes.len())
            .field("packages", &self.imported_packages())
            .finish()
    }
}
