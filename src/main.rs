use clap::Parser;
use pickem::cli::{self, Cli, Commands};
use pickem::config::AppConfig;

mod main_runtime;

use main_runtime::{init_logging, init_logging_simple};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::CheckConfig => init_logging_simple(),
        _ => {
            // Logging settings come from the same config directory; a broken
            // config is reported by the command itself.
            let logging = AppConfig::load_from(&cli.config)
                .map(|config| config.logging)
                .unwrap_or_default();
            init_logging(&logging);
        }
    }

    cli::run(cli)
}
