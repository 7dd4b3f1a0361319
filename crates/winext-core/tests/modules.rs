//! Integration tests for winext-core.
//!
//! Drives the module registry through its public API against a scripted
//! execution port standing in for PowerShell and DISM.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::executor::block_on;
use serde_json::json;

use winext_core::module::ModuleRegistry;
use winext_core::ports::ExecPort;
use winext_types::args::{ArgValue, Credential, InvocationArgs};
use winext_types::exec::RunOptions;
use winext_types::grains::{Grains, KERNEL, OS_FAMILY, OS_RELEASE, OS_VERSION};
use winext_types::Result;

const CATALOG: &str = r#"[{"Name":"Add-AdfsRelyingPartyTrust","Synopsis":"Adds a relying party trust."},{"Name":"Get-AdfsProperties","Synopsis":"Gets properties."},{"Name":"Set-AdfsProperties","Synopsis":"Sets properties."}]"#;

struct ScriptedHost {
    log: RefCell<Vec<(String, RunOptions)>>,
}

impl ScriptedHost {
    fn new() -> Rc<Self> {
        Rc::new(Self { log: RefCell::new(Vec::new()) })
    }
}

#[async_trait(?Send)]
impl ExecPort for ScriptedHost {
    async fn run(&self, cmd: &str, opts: &RunOptions) -> Result<String> {
        self.log.borrow_mut().push((cmd.to_string(), opts.clone()));
        if cmd.contains("Get-Help ADFS") {
            return Ok(CATALOG.to_string());
        }
        if cmd.contains("Get-AdfsProperties") {
            return Ok(r#"{"HostName":"sts.corp.example","HttpsPort":443}"#.to_string());
        }
        if cmd.starts_with("dism") {
            return Ok("Feature Name : TelnetClient\nState : Enabled\n\nThe operation completed successfully.\n".to_string());
        }
        Ok(String::new())
    }
}

fn server_2008_r2() -> Grains {
    Grains::new()
        .with(OS_FAMILY, "Windows")
        .with(OS_RELEASE, "2008ServerR2")
        .with(KERNEL, "Windows")
        .with(OS_VERSION, "6.1.7601")
}

#[test]
fn loads_both_modules_with_one_discovery() {
    let host = ScriptedHost::new();
    let registry = block_on(ModuleRegistry::load(&server_2008_r2(), host.clone()));

    assert_eq!(registry.names(), vec!["identityserver_sts", "windows_servicing"]);
    assert_eq!(host.log.borrow().len(), 1);

    let sts = registry.get("identityserver_sts").unwrap();
    let names: Vec<String> = sts.functions().into_iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        vec!["add_adfsrelyingpartytrust", "get_adfsproperties", "set_adfsproperties"]
    );
}

#[test]
fn proxy_call_returns_parsed_json() {
    let host = ScriptedHost::new();
    let registry = block_on(ModuleRegistry::load(&server_2008_r2(), host.clone()));

    let result = block_on(registry.call("identityserver_sts.get_adfsproperties", &InvocationArgs::new())).unwrap();
    assert_eq!(result, json!({"HostName": "sts.corp.example", "HttpsPort": 443}));

    let log = host.log.borrow();
    let (cmd, opts) = log.last().unwrap();
    assert_eq!(
        cmd,
        "Add-PSSnapin Microsoft.Adfs.PowerShell; Get-AdfsProperties | ConvertTo-Json -Compress -Depth 32"
    );
    assert_eq!(opts.shell.as_deref(), Some("powershell"));
}

#[test]
fn proxy_call_renders_credential() {
    let host = ScriptedHost::new();
    let registry = block_on(ModuleRegistry::load(&server_2008_r2(), host.clone()));

    let args = InvocationArgs::new()
        .with("Name", "Portal")
        .with("Credential", ArgValue::Credential(Credential::new("CORP\\svc", "pa55")));
    let result = block_on(registry.call("identityserver_sts.add_adfsrelyingpartytrust", &args)).unwrap();
    assert_eq!(result, json!({}));

    let log = host.log.borrow();
    let (cmd, _) = log.last().unwrap();
    assert!(cmd.starts_with("Add-PSSnapin Microsoft.Adfs.PowerShell; Add-AdfsRelyingPartyTrust -Name \"Portal\" -Credential (New-Object"));
    assert!(cmd.contains("-ArgumentList \"CORP\\svc\", (ConvertTo-SecureString -String \"pa55\" -AsPlainText -Force))"));
}

#[test]
fn servicing_reports_already_installed() {
    let host = ScriptedHost::new();
    let registry = block_on(ModuleRegistry::load(&server_2008_r2(), host));

    let args = InvocationArgs::new().with("name", "TelnetClient");
    let report = block_on(registry.call("windows_servicing.enable_feature", &args)).unwrap();
    assert_eq!(report["result"], true);
    assert_eq!(report["comment"], "Feature TelnetClient already installed");
}
