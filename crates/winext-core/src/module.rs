//! Module interface and the registry of loaded modules.
//!
//! Functions are addressed as `module.function`, the way the agent's CLI
//! names them (`windows_servicing.get_features`).

use std::collections::BTreeMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use winext_types::{args::InvocationArgs, cmdlet::FunctionDoc, grains::Grains, ExtError, Result};

use crate::identity_server::IdentityServerModule;
use crate::ports::ExecPort;
use crate::servicing::WindowsServicingModule;

#[async_trait(?Send)]
pub trait ExtensionModule {
    /// Name the module is registered under.
    fn name(&self) -> &'static str;

    /// Callable functions, sorted by name.
    fn functions(&self) -> Vec<FunctionDoc>;

    async fn call(&self, function: &str, args: &InvocationArgs) -> Result<Value>;

    fn doc(&self, function: &str) -> Option<String> {
        self.functions()
            .into_iter()
            .find(|f| f.name == function)
            .map(|f| f.doc)
    }
}

/// Registry of loaded modules
#[derive(Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<&'static str, Box<dyn ExtensionModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every module applicable to the host described by `grains`.
    ///
    /// Each module decides applicability itself; inapplicable modules are
    /// simply absent.
    pub async fn load(grains: &Grains, exec: Rc<dyn ExecPort>) -> Self {
        let mut registry = Self::new();

        match IdentityServerModule::load(grains, exec.clone()).await {
            Some(module) => registry.register(Box::new(module)),
            None => log::debug!("identityserver_sts not applicable to this host"),
        }
        match WindowsServicingModule::load(grains, exec) {
            Some(module) => registry.register(Box::new(module)),
            None => log::debug!("windows_servicing not applicable to this host"),
        }

        log::info!("Loaded {} module(s): {:?}", registry.len(), registry.names());
        registry
    }

    /// Register a module, replacing any module of the same name.
    pub fn register(&mut self, module: Box<dyn ExtensionModule>) {
        self.modules.insert(module.name(), module);
    }

    pub fn get(&self, name: &str) -> Option<&dyn ExtensionModule> {
        self.modules.get(name).map(|m| m.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.modules.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Call `module.function`.
    pub async fn call(&self, qualified: &str, args: &InvocationArgs) -> Result<Value> {
        let (module, function) = split_qualified(qualified)?;
        self.module(module)?.call(function, args).await
    }

    pub fn doc(&self, qualified: &str) -> Result<String> {
        let (module, function) = split_qualified(qualified)?;
        self.module(module)?
            .doc(function)
            .ok_or_else(|| ExtError::UnknownFunction {
                module: module.to_string(),
                function: function.to_string(),
            })
    }

    fn module(&self, name: &str) -> Result<&dyn ExtensionModule> {
        self.get(name)
            .ok_or_else(|| ExtError::UnknownModule(name.to_string()))
    }
}

/// Split `module.function` at the first dot.
pub fn split_qualified(qualified: &str) -> Result<(&str, &str)> {
    match qualified.split_once('.') {
        Some((module, function)) if !module.is_empty() && !function.is_empty() => {
            Ok((module, function))
        }
        _ => Err(ExtError::InvalidArgument(format!(
            "expected module.function, got '{}'",
            qualified
        ))),
    }
}
