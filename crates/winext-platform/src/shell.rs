//! Process adapter: runs command lines as child processes.
//!
//! Interpreter selection:
//! - `powershell` → `powershell.exe -NoProfile -NonInteractive -Command <cmd>`
//! - `use_shell` → `cmd.exe /C <cmd>` on Windows, `/bin/sh -c <cmd>` elsewhere
//! - otherwise the line is split on whitespace and executed directly

use std::process::Command;

use async_trait::async_trait;

use winext_core::ports::ExecPort;
use winext_types::{config::ShellConfig, exec::RunOptions, ExtError, Result};

pub struct ProcessShell {
    config: ShellConfig,
}

impl ProcessShell {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    /// Build the child process for `cmd` without spawning it.
    pub fn command(&self, cmd: &str, opts: &RunOptions) -> Result<Command> {
        if opts.is_powershell() {
            let mut command = Command::new(&self.config.powershell_exe);
            command.args(["-NoProfile", "-NonInteractive", "-Command", cmd]);
            return Ok(command);
        }

        if let Some(shell) = opts.shell.as_deref() {
            return Err(ExtError::Exec(format!("unsupported shell: {}", shell)));
        }

        if opts.use_shell {
            let mut command = if cfg!(windows) {
                let mut c = Command::new(&self.config.cmd_exe);
                c.arg("/C");
                c
            } else {
                let mut c = Command::new(&self.config.posix_shell);
                c.arg("-c");
                c
            };
            command.arg(cmd);
            return Ok(command);
        }

        let mut argv = cmd.split_whitespace();
        let program = argv
            .next()
            .ok_or_else(|| ExtError::Exec("empty command line".to_string()))?;
        let mut command = Command::new(program);
        command.args(argv);
        Ok(command)
    }
}

impl Default for ProcessShell {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

#[async_trait(?Send)]
impl ExecPort for ProcessShell {
    async fn run(&self, cmd: &str, opts: &RunOptions) -> Result<String> {
        let output = self
            .command(cmd, opts)?
            .output()
            .map_err(|e| ExtError::Exec(format!("failed to spawn child process: {}", e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            log::debug!("stderr: {}", stderr.trim());
        }
        if !output.status.success() && !opts.ignore_retcode {
            log::warn!("Command exited with {}", output.status);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
