//! PowerShell invocation wrapper.
//!
//! A cmdlet call is rendered as one command line, run through the execution
//! port with PowerShell as the interpreter, and its output is serialized to
//! JSON by PowerShell itself.
//!
//! Known weakness: argument values are interpolated without escaping. A `"`
//! inside a string value terminates the quoted token, and credential passwords
//! appear in clear text on the child's command line.

use std::rc::Rc;

use serde_json::{Map, Value};
use winext_types::{
    args::{ArgValue, Credential, InvocationArgs},
    exec::RunOptions,
    grains::{Grains, SNAPIN_RELEASES},
};

use crate::ports::ExecPort;

/// Loads the AD FS 2.0 cmdlets on releases where they ship as a snap-in.
pub const SNAPIN_DIRECTIVE: &str = "Add-PSSnapin Microsoft.Adfs.PowerShell;";

/// Agent-internal keyword arguments (`__pub_fun`, `__pub_jid`, ...) contain this.
pub const RESERVED_PREFIX: &str = "__pub";

pub const JSON_DIRECTIVE: &str = "| ConvertTo-Json -Compress -Depth 32";

const CREDENTIAL_TYPE: &str = "System.Management.Automation.PSCredential";

/// PowerShell expression constructing a PSCredential.
pub fn credential_expression(credential: &Credential) -> String {
    format!(
        "New-Object -TypeName {} -ArgumentList \"{}\", (ConvertTo-SecureString -String \"{}\" -AsPlainText -Force)",
        CREDENTIAL_TYPE, credential.username, credential.password
    )
}

/// Render one keyword argument as a cmdlet parameter.
pub fn render_flag(key: &str, value: &ArgValue) -> String {
    match value {
        ArgValue::Bool(true) => format!("-{}:$True", key),
        ArgValue::Bool(false) => format!("-{}:$False", key),
        ArgValue::Credential(credential) => {
            format!("-{} ({})", key, credential_expression(credential))
        }
        ArgValue::Int(i) => format!("-{} {}", key, i),
        ArgValue::Str(s) => format!("-{} \"{}\"", key, s),
        ArgValue::Other(v) => format!("-{} \"{}\"", key, v),
    }
}

/// Assemble the full command line for `cmdlet`.
pub fn build_command(cmdlet: &str, args: &InvocationArgs, load_snapin: bool) -> String {
    let mut cmd: Vec<String> = Vec::with_capacity(args.len() + 3);

    if load_snapin {
        cmd.push(SNAPIN_DIRECTIVE.to_string());
    }

    cmd.push(cmdlet.to_string());

    for (key, value) in args.iter() {
        if key.contains(RESERVED_PREFIX) {
            continue;
        }
        cmd.push(render_flag(key, value));
    }

    cmd.push(JSON_DIRECTIVE.to_string());
    cmd.join(" ")
}

/// The value returned when a cmdlet produced nothing usable.
pub fn empty_result() -> Value {
    Value::Object(Map::new())
}

/// Parse PowerShell's JSON output. Unparsable output, empty output included,
/// is logged at error level and degrades to an empty object; callers cannot
/// tell it apart from "no data".
pub fn parse_output(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Error converting PowerShell JSON return ({}): {}", e, raw);
            empty_result()
        }
    }
}

/// Runs cmdlets through the execution port.
#[derive(Clone)]
pub struct PowerShellInvoker {
    exec: Rc<dyn ExecPort>,
    load_snapin: bool,
}

impl PowerShellInvoker {
    pub fn new(exec: Rc<dyn ExecPort>, load_snapin: bool) -> Self {
        Self { exec, load_snapin }
    }

    /// Invoker for the host described by `grains`; older releases get the
    /// snap-in directive.
    pub fn for_grains(exec: Rc<dyn ExecPort>, grains: &Grains) -> Self {
        Self::new(exec, grains.release_in(SNAPIN_RELEASES))
    }

    pub fn loads_snapin(&self) -> bool {
        self.load_snapin
    }

    pub fn command(&self, cmdlet: &str, args: &InvocationArgs) -> String {
        build_command(cmdlet, args, self.load_snapin)
    }

    /// Run `cmdlet` once. Never fails: execution errors and bad JSON both
    /// come back as an empty object.
    pub async fn invoke(&self, cmdlet: &str, args: &InvocationArgs) -> Value {
        let cmd = self.command(cmdlet, args);
        log::debug!("Invoking cmdlet {} ({} args)", cmdlet, args.len());

        match self.exec.run(&cmd, &RunOptions::powershell()).await {
            Ok(output) => parse_output(&output),
            Err(e) => {
                log::error!("Error running PowerShell cmdlet {}: {}", cmdlet, e);
                empty_result()
            }
        }
    }
}
