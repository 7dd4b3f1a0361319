use std::process::ExitCode;

use clap::Parser;

use winext_app::cli::Cli;
use winext_platform::load_config;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("winext: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();
    log::debug!("winext starting with {:?}", cli.command);

    match futures::executor::block_on(winext_app::run(&cli, &config)) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to render result: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("winext: {}", e);
            ExitCode::FAILURE
        }
    }
}
