//! Extension modules for the configuration-management agent.
//!
//! Modules talk to the host only through the traits in [`ports`]; concrete
//! adapters live in `winext-platform`.

pub mod identity_server;
pub mod install_type;
pub mod module;
pub mod ports;
pub mod powershell;
pub mod servicing;


pub use module::{ExtensionModule, ModuleRegistry};
