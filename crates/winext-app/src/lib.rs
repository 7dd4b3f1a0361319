//! winext: composition root.
//!
//! Assembles the platform adapters, computes the effective grains and loads
//! every applicable module. `main.rs` only parses arguments and prints.

pub mod cli;
pub mod kwargs;


use std::rc::Rc;

use serde_json::{Map, Value};
use winext_core::install_type::windows_installation_type;
use winext_core::ports::{ExecPort, HostProbe};
use winext_core::ModuleRegistry;
use winext_platform::{load_grains, LocalHostProbe, ProcessShell};
use winext_types::{config::ExtConfig, grains::Grains, Result};

use cli::{Cli, Commands};

/// Loaded state of one agent process: grains plus modules, built once.
pub struct Minion {
    grains: Grains,
    modules: ModuleRegistry,
}

impl Minion {
    /// Compute grains and load modules.
    ///
    /// Precedence, lowest first: `base`, the installation-type grain,
    /// `overrides`.
    pub async fn start(
        base: Grains,
        overrides: Grains,
        exec: Rc<dyn ExecPort>,
        probe: &dyn HostProbe,
    ) -> Self {
        let mut grains = base;
        grains.merge(windows_installation_type(probe).await);
        grains.merge(overrides);

        let modules = ModuleRegistry::load(&grains, exec).await;
        Self { grains, modules }
    }

    pub fn grains(&self) -> &Grains {
        &self.grains
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub async fn execute(&self, command: &Commands) -> Result<Value> {
        match command {
            Commands::Grains => Ok(serde_json::to_value(&self.grains)?),
            Commands::List => Ok(self.listing()),
            Commands::Doc { function } => Ok(Value::String(self.modules.doc(function)?)),
            Commands::Call { function, args } => {
                let args = kwargs::parse_kwargs(args)?;
                self.modules.call(function, &args).await
            }
        }
    }

    fn listing(&self) -> Value {
        let mut listing = Map::new();
        for name in self.modules.names() {
            let Some(module) = self.modules.get(name) else {
                continue;
            };
            let functions: Map<String, Value> = module
                .functions()
                .into_iter()
                .map(|f| (f.name, Value::String(f.doc)))
                .collect();
            listing.insert(name.to_string(), Value::Object(functions));
        }
        Value::Object(listing)
    }
}

/// Run one CLI command against the local host.
pub async fn run(cli: &Cli, config: &ExtConfig) -> Result<Value> {
    let base = match cli.grains.as_deref() {
        Some(path) => load_grains(path)?,
        None => Grains::new(),
    };
    let overrides = kwargs::parse_grain_overrides(&cli.grain)?;

    let exec: Rc<dyn ExecPort> = Rc::new(ProcessShell::new(config.shell.clone()));
    let probe = LocalHostProbe::new(exec.clone());

    let minion = Minion::start(base, overrides, exec, &probe).await;
    minion.execute(&cli.command).await
}
