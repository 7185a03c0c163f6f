//! carechunk - Turn-aware chunking of doctor-patient transcripts
//!
//! Splits each transcript into token-bounded chunks that end on a completed
//! doctor/patient exchange, then asks a completion service to extract
//! demographic and health details from every chunk.

pub mod backend;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod tokenizer;
pub mod transcripts;

use thiserror::Error;

/// Main error type for carechunk
#[derive(Error, Debug)]
pub enum CarechunkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CarechunkError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "carechunk";
