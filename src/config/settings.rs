//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend::Backend;

/// Environment variable consulted when `llm.api_key` is empty
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Chunking settings
    #[serde(default)]
    pub chunking: ChunkingSettings,

    /// Completion service settings
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Transcripts file read when no --input is given
    #[serde(default = "default_input")]
    pub input: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingSettings {
    /// Maximum number of tokens per chunk
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Completion API flavour (chat, completion)
    #[serde(default)]
    pub backend: Backend,

    /// API key (falls back to OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model used with the chat backend
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used with the completion backend
    #[serde(default = "default_completion_model")]
    pub completion_model: String,

    /// Output token cap sent with completion requests
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions

fn default_input() -> PathBuf {
    PathBuf::from("./transcripts.json")
}

fn default_max_tokens() -> usize {
    100
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_completion_model() -> String {
    "text-davinci-003".to_string()
}

fn default_max_output_tokens() -> u32 {
    150
}

fn default_timeout_secs() -> u64 {
    45
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            input: default_input(),
        }
    }
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            chat_model: default_chat_model(),
            completion_model: default_completion_model(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmSettings {
    /// Model id for the configured backend.
    pub fn model(&self) -> &str {
        match self.backend {
            Backend::Chat => &self.chat_model,
            Backend::Completion => &self.completion_model,
        }
    }

    /// Replace the model id of the configured backend.
    pub fn set_model(&mut self, model: String) {
        match self.backend {
            Backend::Chat => self.chat_model = model,
            Backend::Completion => self.completion_model = model,
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let mut settings = Self::load_from(&config_path)?;
        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Parse a specific configuration file, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if self.llm.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                if !key.trim().is_empty() {
                    self.llm.api_key = key;
                }
            }
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_tokens == 0 {
            anyhow::bail!("chunking.max_tokens must be at least 1");
        }
        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be at least 1");
        }
        if self.llm.model().trim().is_empty() {
            anyhow::bail!("No model configured for the {} backend", self.llm.backend);
        }
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "carechunk", "carechunk")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.max_tokens, 100);
        assert_eq!(settings.llm.backend, Backend::Chat);
        assert_eq!(settings.llm.model(), "gpt-3.5-turbo");
        assert_eq!(settings.llm.max_output_tokens, 150);
        assert_eq!(settings.general.input, PathBuf::from("./transcripts.json"));
    }

    #[test]
    fn model_follows_backend() {
        let mut settings = Settings::default();
        settings.llm.backend = Backend::Completion;
        assert_eq!(settings.llm.model(), "text-davinci-003");

        settings.llm.set_model("davinci-002".to_string());
        assert_eq!(settings.llm.completion_model, "davinci-002");
        assert_eq!(settings.llm.chat_model, "gpt-3.5-turbo");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chunking]\nmax_tokens = 40\n\n[llm]\nbackend = \"completion\"\n")
            .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.chunking.max_tokens, 40);
        assert_eq!(settings.llm.backend, Backend::Completion);
        assert_eq!(settings.llm.endpoint, "https://api.openai.com");
        assert_eq!(settings.llm.timeout_secs, 45);
    }

    #[test]
    fn written_defaults_parse_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Settings::write_default(&path).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.chunking.max_tokens, 100);
        assert_eq!(settings.llm.chat_model, "gpt-3.5-turbo");
    }

    #[test]
    fn unknown_backend_fails_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nbackend = \"davinci\"\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let mut settings = Settings::default();
        settings.chunking.max_tokens = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.llm.timeout_secs = 0;
        assert!(settings.validate().is_err());

        assert!(Settings::default().validate().is_ok());
    }
}
