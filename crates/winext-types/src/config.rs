use serde::{Deserialize, Serialize};

/// Top-level configuration for the extension host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtConfig {
    pub shell: ShellConfig,
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ExtConfig {
    fn default() -> Self {
        Self {
            shell: ShellConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

/// Interpreter locations used by the process adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub powershell_exe: String,
    pub cmd_exe: String,
    pub posix_shell: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            powershell_exe: DEFAULT_POWERSHELL_EXE.to_string(),
            cmd_exe: DEFAULT_CMD_EXE.to_string(),
            posix_shell: "/bin/sh".to_string(),
        }
    }
}

// Absolute paths avoid PATH-search hijacking from a privileged agent.
const DEFAULT_POWERSHELL_EXE: &str = r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe";
const DEFAULT_CMD_EXE: &str = r"C:\Windows\System32\cmd.exe";

impl ExtConfig {
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        serde_json::from_str(raw).map_err(|e| crate::ExtError::Config(e.to_string()))
    }
}
