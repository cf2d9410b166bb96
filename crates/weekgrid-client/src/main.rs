//! weekgrid CLI entry point.

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::debug;

use weekgrid_client::cli::{Cli, Command, ConfigAction};
use weekgrid_client::commands::render::{RenderArgs, render};
use weekgrid_client::config::ClientConfig;
use weekgrid_client::error::ClientResult;
use weekgrid_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {e}");
    }

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output.trim_end());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<String> {
    let mut config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    if let Some(ref timezone) = cli.timezone {
        config.layout.timezone = timezone.clone();
    }
    debug!(
        calendars = config.calendars.len(),
        timezone = %config.layout.timezone,
        "loaded configuration"
    );

    match cli.command {
        Some(Command::Config { ref action }) => match action {
            ConfigAction::Dump => weekgrid_client::commands::config::dump(&config),
            ConfigAction::Validate => weekgrid_client::commands::config::validate(&config),
            ConfigAction::Path => Ok(weekgrid_client::commands::config::path()),
        },
        None => render(&RenderArgs::from(&cli), &config, Utc::now()).await,
    }
}
