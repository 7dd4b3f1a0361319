//! AD FS cmdlet proxies.
//!
//! At load time the module asks PowerShell for the AD FS cmdlet catalog and
//! registers one proxy per cmdlet, named `get_adfsproperties` for
//! `Get-AdfsProperties`. The catalog is fetched once and never refreshed.

use std::collections::BTreeMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use winext_types::{
    args::InvocationArgs,
    cmdlet::{CmdletDescriptor, FunctionDoc},
    grains::{Grains, ADFS_RELEASES},
    ExtError, Result,
};

use crate::module::ExtensionModule;
use crate::ports::ExecPort;
use crate::powershell::PowerShellInvoker;

pub const MODULE_NAME: &str = "identityserver_sts";

pub const DISCOVERY_QUERY: &str =
    "Get-Help ADFS | Where-Object { $_.Category -eq 'Cmdlet' } | Select Name,Synopsis | Sort Name";

/// A generated function bound to one cmdlet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdletProxy {
    function_name: String,
    cmdlet: String,
    doc: String,
}

impl CmdletProxy {
    pub fn new(descriptor: &CmdletDescriptor) -> Self {
        Self {
            function_name: descriptor.function_name(),
            cmdlet: descriptor.name.clone(),
            doc: descriptor.synopsis.clone(),
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// The cmdlet this proxy runs, as PowerShell spells it.
    pub fn cmdlet(&self) -> &str {
        &self.cmdlet
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub async fn invoke(&self, invoker: &PowerShellInvoker, args: &InvocationArgs) -> Value {
        invoker.invoke(&self.cmdlet, args).await
    }
}

/// Proxies keyed by normalized function name.
#[derive(Debug, Clone, Default)]
pub struct CmdletRegistry {
    proxies: BTreeMap<String, CmdletProxy>,
}

impl CmdletRegistry {
    pub fn from_descriptors<'a>(descriptors: impl IntoIterator<Item = &'a CmdletDescriptor>) -> Self {
        let mut registry = Self::default();
        for descriptor in descriptors {
            registry.register(CmdletProxy::new(descriptor));
        }
        registry
    }

    /// Later registrations under the same name win.
    fn register(&mut self, proxy: CmdletProxy) {
        if let Some(previous) = self.proxies.insert(proxy.function_name.clone(), proxy) {
            log::warn!(
                "Cmdlet {} replaced an earlier proxy with the same name",
                previous.cmdlet
            );
        }
    }

    pub fn get(&self, function: &str) -> Option<&CmdletProxy> {
        self.proxies.get(function)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CmdletProxy> {
        self.proxies.values()
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}

/// Turn the discovery output into descriptors.
///
/// `ConvertTo-Json` emits a bare object when the pipeline yields a single
/// record; anything other than an object or array is an empty catalog.
pub fn parse_catalog(value: Value) -> Vec<CmdletDescriptor> {
    let records = match value {
        Value::Array(records) => records,
        Value::Object(map) if map.is_empty() => Vec::new(),
        record @ Value::Object(_) => vec![record],
        _ => Vec::new(),
    };

    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<CmdletDescriptor>(record.clone()) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                log::warn!("Skipping malformed cmdlet record {}: {}", record, e);
                None
            }
        })
        .collect()
}

pub struct IdentityServerModule {
    invoker: PowerShellInvoker,
    registry: CmdletRegistry,
}

impl IdentityServerModule {
    /// Windows Server 2008 and newer.
    pub fn is_applicable(grains: &Grains) -> bool {
        grains.is_windows() && grains.release_in(ADFS_RELEASES)
    }

    /// Discover the cmdlet catalog and build the proxies. `None` when the
    /// host is not applicable; a failed discovery still loads the module,
    /// just with no functions.
    pub async fn load(grains: &Grains, exec: Rc<dyn ExecPort>) -> Option<Self> {
        if !Self::is_applicable(grains) {
            return None;
        }

        let invoker = PowerShellInvoker::for_grains(exec, grains);
        let catalog = invoker.invoke(DISCOVERY_QUERY, &InvocationArgs::new()).await;
        let descriptors = parse_catalog(catalog);
        let registry = CmdletRegistry::from_descriptors(&descriptors);
        log::info!("Discovered {} AD FS cmdlet(s)", registry.len());

        Some(Self::with_registry(invoker, registry))
    }

    pub fn with_registry(invoker: PowerShellInvoker, registry: CmdletRegistry) -> Self {
        Self { invoker, registry }
    }

    pub fn registry(&self) -> &CmdletRegistry {
        &self.registry
    }

    pub fn invoker(&self) -> &PowerShellInvoker {
        &self.invoker
    }
}

#[async_trait(?Send)]
impl ExtensionModule for IdentityServerModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn functions(&self) -> Vec<FunctionDoc> {
        self.registry
            .iter()
            .map(|p| FunctionDoc::new(p.function_name(), p.doc()))
            .collect()
    }

    async fn call(&self, function: &str, args: &InvocationArgs) -> Result<Value> {
        let proxy = self
            .registry
            .get(function)
            .ok_or_else(|| ExtError::UnknownFunction {
                module: MODULE_NAME.to_string(),
                function: function.to_string(),
            })?;
        Ok(proxy.invoke(&self.invoker, args).await)
    }
}
