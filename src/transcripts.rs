//! Transcript input file loading

use serde::Deserialize;
use std::path::Path;

use crate::{CarechunkError, Result};

/// Contents of a transcripts file: `{"transcripts": ["...", ...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptFile {
    pub transcripts: Vec<String>,
}

impl TranscriptFile {
    /// Read and parse a transcripts file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CarechunkError::Input(format!(
                "Failed to read transcripts file {}: {}",
                path.display(),
                e
            ))
        })?;

        let file = Self::parse(&content).map_err(|e| {
            CarechunkError::Input(format!(
                "Failed to parse transcripts file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            "Loaded {} transcripts from {}",
            file.transcripts.len(),
            path.display()
        );

        Ok(file)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
