//! voxnorm - Turn noisy spoken transcripts into canonical voice-agent commands
//!
//! Entry point for the voxnorm CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voxnorm::cli::{Cli, Commands};
use voxnorm::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        voxnorm::cli::completions::print(shell);
        return Ok(());
    }

    // Load configuration only for runtime commands.
    let settings = Settings::load()?;

    let default_level = if cli.verbose {
        "debug"
    } else {
        settings.general.log_level.as_str()
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Normalize { text, json } => {
            voxnorm::cli::commands::normalize_transcript(&settings, text, json).await?;
        }
        Commands::Doctor { json } => {
            voxnorm::cli::commands::run_doctor(&settings, json).await?;
        }
        Commands::Config(config_cmd) => {
            voxnorm::cli::commands::config_command(&settings, config_cmd)?;
        }
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
