//! Configuration module for carechunk
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::{ChunkingSettings, GeneralSettings, LlmSettings, Settings, API_KEY_ENV};
