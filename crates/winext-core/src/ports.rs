//! Port traits: the boundary between modules and the host.
//!
//! Implementations live in `winext-platform` (process and filesystem
//! adapters). Modules never spawn processes themselves.

use std::path::Path;

use async_trait::async_trait;
use winext_types::{exec::RunOptions, Result};

// ─── Execution Port ──────────────────────────────────────────

/// The agent's "run a command" primitive.
#[async_trait(?Send)]
pub trait ExecPort {
    /// Run `cmd` to completion and return its standard output.
    ///
    /// Blocks for the lifetime of the child; there is no timeout.
    async fn run(&self, cmd: &str, opts: &RunOptions) -> Result<String>;
}

// ─── Host Probe Port ─────────────────────────────────────────

/// Facts about the local Windows installation.
#[async_trait(?Send)]
pub trait HostProbe {
    /// `Win32_OperatingSystem.ProductType`: 1 workstation, 2 domain
    /// controller, 3 server. `None` when WMI cannot be queried.
    async fn product_type(&self) -> Option<u32>;

    /// Release tag such as `2012ServerR2`.
    async fn os_release(&self) -> Option<String>;

    /// Value of `%windir%`.
    fn windir(&self) -> Option<String>;

    fn is_file(&self, path: &Path) -> bool;
}
