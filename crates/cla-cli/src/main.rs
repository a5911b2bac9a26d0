use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cla_cli::commands::analyze;
use cla_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Analyze {
            file,
            json,
            output,
            session_gap,
            silence_gap,
            freq_tolerance,
        }) => {
            let mut config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");

            // CLI flags win over config file and environment.
            if let Some(minutes) = session_gap {
                config.session_gap_minutes = *minutes;
            }
            if let Some(minutes) = silence_gap {
                config.silence_gap_minutes = *minutes;
            }
            if let Some(khz) = freq_tolerance {
                config.freq_tolerance_khz = *khz;
            }

            analyze::run(file, &config.analysis_config(), *json, output.as_deref())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
