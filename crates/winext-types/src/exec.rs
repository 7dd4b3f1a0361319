use serde::{Deserialize, Serialize};

/// How the execution port should run a command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Named interpreter, e.g. `powershell`. `None` uses the platform default.
    pub shell: Option<String>,
    /// Hand the whole string to the interpreter instead of splitting argv
    pub use_shell: bool,
    /// Do not report a non-zero exit status
    pub ignore_retcode: bool,
}

impl RunOptions {
    pub fn powershell() -> Self {
        Self {
            shell: Some(POWERSHELL.to_string()),
            use_shell: true,
            ignore_retcode: false,
        }
    }

    pub fn ignore_retcode() -> Self {
        Self {
            shell: None,
            use_shell: false,
            ignore_retcode: true,
        }
    }

    pub fn is_powershell(&self) -> bool {
        self.shell.as_deref() == Some(POWERSHELL)
    }
}

pub const POWERSHELL: &str = "powershell";
