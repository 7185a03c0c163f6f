use anyhow::Result;
use async_trait::async_trait;

use crate::config::Settings;
use crate::llm::openai::OpenAiSummarizer;

/// Extracts patient details from the decoded text of one chunk.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, chunk_text: &str) -> Result<String>;
}

/// Build a summarizer from runtime settings.
pub fn build_summarizer(settings: &Settings) -> Result<Box<dyn Summarizer>> {
    Ok(Box::new(OpenAiSummarizer::from_settings(settings)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn summarizer_requires_api_key() {
        let settings = Settings::default();

        let err = match build_summarizer(&settings) {
            Ok(_) => panic!("expected summarizer creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("API key is missing"));
    }

    #[test]
    fn summarizer_builds_with_api_key() {
        let mut settings = Settings::default();
        settings.llm.api_key = "sk-test".to_string();

        assert!(build_summarizer(&settings).is_ok());
    }
}
