//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::backend::Backend;

/// carechunk - Turn-aware chunking and summarization of doctor-patient transcripts
#[derive(Parser, Debug)]
#[command(name = "carechunk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk every transcript and summarize each chunk
    Summarize(RunArgs),

    /// Show chunk boundaries without calling the completion service
    Chunk {
        #[command(flatten)]
        run: RunArgs,

        /// Print chunks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Per-run overrides of the configured settings
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Transcripts JSON file (defaults to general.input)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Completion backend (defaults to llm.backend)
    #[arg(short, long, value_enum)]
    pub backend: Option<Backend>,

    /// Maximum tokens per chunk (defaults to chunking.max_tokens)
    #[arg(short, long)]
    pub max_tokens: Option<usize>,

    /// Model id for the selected backend
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
