pub mod files;
pub mod probe;
pub mod shell;

pub use files::{load_config, load_grains};
pub use probe::LocalHostProbe;
pub use shell::ProcessShell;
