//! carechunk - Turn-aware transcript chunking and summarization
//!
//! Entry point for the carechunk CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use carechunk::cli::{Cli, Commands};
use carechunk::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    tracing::debug!("{} {}", carechunk::APP_NAME, carechunk::VERSION);

    match cli.command {
        Commands::Completions { shell } => {
            carechunk::cli::commands::print_completions(shell, &mut std::io::stdout());
        }
        command => {
            // Secrets may live in a local .env file.
            dotenvy::dotenv().ok();

            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Summarize(run) => {
                    carechunk::cli::commands::summarize_transcripts(&settings, run).await?;
                }
                Commands::Chunk { run, json } => {
                    carechunk::cli::commands::preview_chunks(&settings, run, json)?;
                }
                Commands::Config(config_cmd) => {
                    carechunk::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
