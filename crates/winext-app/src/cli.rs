use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Run Windows extension modules outside the agent.
#[derive(Parser, Debug)]
#[command(name = "winext", version, about)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Grains file (JSON object)
    #[arg(long, global = true)]
    pub grains: Option<PathBuf>,

    /// Override a single grain
    #[arg(long = "grain", value_name = "KEY=VALUE", global = true)]
    pub grain: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Print the effective grains
    Grains,
    /// List loaded modules and their functions
    List,
    /// Show the documentation of one function
    Doc {
        /// module.function
        function: String,
    },
    /// Call a function
    Call {
        /// module.function
        function: String,
        /// Keyword arguments
        #[arg(value_name = "KEY=VALUE", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}
