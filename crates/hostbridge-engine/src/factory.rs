//! Script engine factory
//!
//! Owns the engine configuration, the lazily built root scope and the set of
//! host object providers. Activation installs the runtime manager as the
//! global context factory; deactivation tears everything down again.

use std::sync::{Arc, Weak};

use hostbridge_sdk::{NativeResult, Scope, Value};
use parking_lot::{Mutex, RwLock};

use crate::bridge::ReflectiveAdapter;
use crate::defaults::{BASE_ENGINE_NAME, LANGUAGE_NAME, LANGUAGE_VERSION, THREADING_MODEL};
use crate::error::{EngineError, EngineResult};
use crate::host_object::{HostObjectClass, HostObjectProvider};
use crate::runtime::{
    EngineConfig, ExecutionContext, OptimizationLevel, RuntimeConfigManager, ScopeProvider,
};
use crate::scope::RootScope;

/// Descriptive engine metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineMetadata {
    /// Engine name including the runtime version
    pub engine_name: String,
    /// Engine version
    pub engine_version: String,
    /// Script language name
    pub language_name: String,
    /// Script language version
    pub language_version: String,
    /// Names the engine is registered under
    pub names: Vec<String>,
    /// Script file extensions
    pub extensions: Vec<String>,
    /// Script MIME types
    pub mime_types: Vec<String>,
}

impl EngineMetadata {
    /// Metadata for a configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        let runtime_version = config.runtime_version.as_deref().unwrap_or("unknown");
        Self {
            engine_name: format!("{} (runtime {})", BASE_ENGINE_NAME, runtime_version),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            language_name: LANGUAGE_NAME.to_string(),
            language_version: LANGUAGE_VERSION.to_string(),
            names: config.names.clone(),
            extensions: config.extensions.clone(),
            mime_types: config.mime_types.clone(),
        }
    }

    /// Look up a named engine parameter
    pub fn parameter(&self, key: &str) -> Option<String> {
        match key {
            "THREADING" => Some(THREADING_MODEL.to_string()),
            "ENGINE" => Some(self.engine_name.clone()),
            "ENGINE_VERSION" => Some(self.engine_version.clone()),
            "LANGUAGE" => Some(self.language_name.clone()),
            "LANGUAGE_VERSION" => Some(self.language_version.clone()),
            "NAME" => self.names.first().cloned(),
            _ => None,
        }
    }
}

impl Default for EngineMetadata {
    fn default() -> Self {
        let mut metadata = Self::from_config(&EngineConfig::default());
        metadata.engine_name = BASE_ENGINE_NAME.to_string();
        metadata
    }
}

struct FactoryState {
    default_host_objects: Vec<Arc<dyn HostObjectClass>>,
    providers: RwLock<Vec<Arc<dyn HostObjectProvider>>>,
    root_scope: Mutex<Option<Arc<RootScope>>>,
    manager: RwLock<Option<Arc<RuntimeConfigManager>>>,
    metadata: RwLock<EngineMetadata>,
}

impl FactoryState {
    fn is_active(&self) -> bool {
        self.manager.read().is_some()
    }

    fn root_scope(&self) -> EngineResult<Arc<RootScope>> {
        if !self.is_active() {
            return Err(EngineError::NotActive);
        }
        let mut slot = self.root_scope.lock();
        if let Some(scope) = slot.as_ref() {
            return Ok(scope.clone());
        }
        // Published only once fully populated.
        let scope = self.build_root_scope();
        *slot = Some(scope.clone());
        Ok(scope)
    }

    fn build_root_scope(&self) -> Arc<RootScope> {
        let scope = RootScope::new();
        scope.install_host_objects(&self.default_host_objects);
        let providers = self.providers.read().clone();
        for provider in &providers {
            install_provider(&scope, provider.as_ref());
        }
        log::debug!("root scope built: {:?}", scope);
        scope
    }

    fn drop_root_scope(&self) {
        if let Some(manager) = self.manager.read().clone() {
            manager.detach_debugger();
        }
        if self.root_scope.lock().take().is_some() {
            log::debug!("root scope dropped");
        }
    }
}

fn install_provider(scope: &RootScope, provider: &dyn HostObjectProvider) {
    scope.install_host_objects(&provider.host_object_classes());
    scope.import_classes(&provider.imported_classes());
    scope.import_packages(&provider.imported_packages());
}

struct FactoryScopeProvider(Weak<FactoryState>);

impl ScopeProvider for FactoryScopeProvider {
    fn scope(&self) -> Option<Arc<RootScope>> {
        self.0.upgrade()?.root_scope().ok()
    }
}

/// Factory for script engines sharing one root scope.
pub struct EngineFactory {
    state: Arc<FactoryState>,
}

impl EngineFactory {
    /// Create an inactive factory with default host objects
    pub fn new(default_host_objects: Vec<Arc<dyn HostObjectClass>>) -> Self {
        Self {
            state: Arc::new(FactoryState {
                default_host_objects,
                providers: RwLock::new(Vec::new()),
                root_scope: Mutex::new(None),
                manager: RwLock::new(None),
                metadata: RwLock::new(EngineMetadata::default()),
            }),
        }
    }

    /// Apply configuration and install the runtime manager.
    ///
    /// # Errors
    /// * `ConfigError::Invalid` - a configuration value has no safe default
    /// * `ConfigError::ForeignFactory` - another component owns the global slot
    pub fn activate(&self, config: &EngineConfig) -> EngineResult<()> {
        config.validate()?;
        let provider: Arc<dyn ScopeProvider> =
            Arc::new(FactoryScopeProvider(Arc::downgrade(&self.state)));
        let manager = RuntimeConfigManager::get_instance(config.runtime_config(), provider)?;
        // An already installed manager keeps its config but follows this flag
        manager.set_debugging(config.debug);

        let metadata = EngineMetadata::from_config(config);
        log::info!("{} activated", metadata.engine_name);
        *self.state.metadata.write() = metadata;
        *self.state.manager.write() = Some(manager);
        Ok(())
    }

    /// Drop the root scope, uninstall the runtime manager and forget providers
    pub fn deactivate(&self) {
        self.state.drop_root_scope();
        let manager = self.state.manager.write().take();
        if let Some(manager) = manager {
            let installed =
                RuntimeConfigManager::current().is_some_and(|m| Arc::ptr_eq(&m, &manager));
            if installed {
                RuntimeConfigManager::teardown();
            }
            log::info!("{} deactivated", self.state.metadata.read().engine_name);
        }
        self.state.providers.write().clear();
    }

    /// Check if the factory is active
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// The runtime manager, while active
    pub fn manager(&self) -> Option<Arc<RuntimeConfigManager>> {
        self.state.manager.read().clone()
    }

    /// Effective optimization level, while active
    pub fn optimization_level(&self) -> Option<OptimizationLevel> {
        self.manager().map(|m| m.config().optimization_level)
    }

    /// The root scope, built on first use
    pub fn root_scope(&self) -> EngineResult<Arc<RootScope>> {
        self.state.root_scope()
    }

    /// Check if the root scope has been built
    pub fn has_root_scope(&self) -> bool {
        self.state.root_scope.lock().is_some()
    }

    /// Register a provider; installs its host objects into a live scope
    pub fn add_host_object_provider(&self, provider: Arc<dyn HostObjectProvider>) {
        self.state.providers.write().push(provider.clone());
        let scope = self.state.root_scope.lock().clone();
        if let Some(scope) = scope {
            install_provider(&scope, provider.as_ref());
        }
    }

    /// Unregister a provider. The root scope is dropped and rebuilt on next use.
    pub fn remove_host_object_provider(&self, provider: &Arc<dyn HostObjectProvider>) -> bool {
        let removed = {
            let mut providers = self.state.providers.write();
            let before = providers.len();
            providers.retain(|p| !std::ptr::addr_eq(Arc::as_ptr(p), Arc::as_ptr(provider)));
            providers.len() != before
        };
        if removed {
            self.state.drop_root_scope();
        }
        removed
    }

    /// Number of registered providers
    pub fn provider_count(&self) -> usize {
        self.state.providers.read().len()
    }

    /// Engine metadata
    pub fn metadata(&self) -> EngineMetadata {
        self.state.metadata.read().clone()
    }

    /// Named engine parameter
    pub fn parameter(&self, key: &str) -> Option<String> {
        self.state.metadata.read().parameter(key)
    }

    /// A script engine bound to the current root scope
    pub fn script_engine(&self) -> EngineResult<ScriptEngine> {
        let manager = self.manager().ok_or(EngineError::NotActive)?;
        let scope = self.root_scope()?;
        Ok(ScriptEngine::new(manager, scope))
    }
}

impl Drop for EngineFactory {
    fn drop(&mut self) {
        if self.is_active() {
            self.deactivate();
        }
    }
}

/// Evaluation handle: enters contexts and resolves members in a root scope.
pub struct ScriptEngine {
    manager: Arc<RuntimeConfigManager>,
    scope: Arc<RootScope>,
    scope_handle: Arc<dyn Scope>,
}

impl ScriptEngine {
    fn new(manager: Arc<RuntimeConfigManager>, scope: Arc<RootScope>) -> Self {
        let scope_handle = scope.as_scope();
        Self {
            manager,
            scope,
            scope_handle,
        }
    }

    /// Enter an execution context, released when the guard drops.
    ///
    /// With debugging enabled, a debugger session is started first if none
    /// is running, so the tool observes this context.
    pub fn enter(&self) -> ContextGuard<'_> {
        self.manager.attach_debugger();
        let context = self.manager.create_context();
        ContextGuard {
            manager: &self.manager,
            context,
        }
    }

    /// Root scope
    pub fn scope(&self) -> &Arc<RootScope> {
        &self.scope
    }

    /// Runtime manager
    pub fn manager(&self) -> &Arc<RuntimeConfigManager> {
        &self.manager
    }

    /// Wrap a value for script space
    pub fn wrap(&self, value: Value) -> Value {
        self.scope.wrap(value)
    }

    /// Resolve `name` on a script value. `None` means not found.
    ///
    /// Unwrapped native values expose the members of their runtime class.
    pub fn get_member(&self, target: &Value, name: &str) -> Option<Value> {
        match target {
            Value::Object(object) => object.get(name, &self.scope_handle),
            Value::Native(native) => {
                ReflectiveAdapter::new(&self.scope_handle, native.clone(), native.native_class())
                    .get(name)
            }
            _ => None,
        }
    }

    /// Resolve and call a method on a script value
    pub fn call_method(&self, target: &Value, name: &str, args: &[Value]) -> NativeResult<Value> {
        match target {
            Value::Object(object) => object.invoke(name, args, &self.scope_handle),
            other => match self.get_member(other, name) {
                Some(Value::Function(func)) => func.call(args),
                Some(_) => Err(hostbridge_sdk::NativeError::NotCallable(name.to_string())),
                None => Err(hostbridge_sdk::NativeError::MemberNotFound(name.to_string())),
            },
        }
    }
}

/// An entered execution context.
pub struct ContextGuard<'a> {
    manager: &'a RuntimeConfigManager,
    context: ExecutionContext,
}

impl ContextGuard<'_> {
    /// The context
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.manager.release_context(&self.context);
    }
}
