use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::config::{Settings, API_KEY_ENV};
use crate::llm::client::Summarizer;
use crate::llm::prompts::{build_chat_prompt, build_completion_prompt};

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";

/// Summarizer backed by an OpenAI-compatible completion API
pub struct OpenAiSummarizer {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    backend: Backend,
    max_output_tokens: u32,
}

impl OpenAiSummarizer {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "OpenAI API key is missing. Set llm.api_key in config or {}.",
                API_KEY_ENV
            );
        }

        let model = settings.llm.model().trim().to_string();
        if model.is_empty() {
            anyhow::bail!("No model configured for the {} backend", settings.llm.backend);
        }

        let endpoint = if settings.llm.endpoint.trim().is_empty() {
            DEFAULT_OPENAI_ENDPOINT.to_string()
        } else {
            settings
                .llm
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(settings.llm.timeout_secs))
                .build()
                .context("Failed to build OpenAI HTTP client")?,
            api_key,
            model,
            endpoint,
            backend: settings.llm.backend,
            max_output_tokens: settings.llm.max_output_tokens,
        })
    }

    fn request_url(&self) -> String {
        match self.backend {
            Backend::Chat => format!("{}/v1/chat/completions", self.endpoint),
            Backend::Completion => format!("{}/v1/completions", self.endpoint),
        }
    }

    fn chat_request(&self, chunk_text: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_chat_prompt(chunk_text),
            }],
        }
    }

    fn completion_request(&self, chunk_text: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            prompt: build_completion_prompt(chunk_text),
            max_tokens: self.max_output_tokens,
        }
    }

    async fn post<B: Serialize + Sync, R: DeserializeOwned>(&self, body: &B) -> Result<R> {
        let url = self.request_url();
        tracing::debug!("OpenAI request to {} (model {})", url, self.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI returned {}: {}", status, body.trim());
        }

        response
            .json()
            .await
            .context("Failed to parse OpenAI response")
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, chunk_text: &str) -> Result<String> {
        match self.backend {
            Backend::Chat => {
                let payload: ChatCompletionResponse =
                    self.post(&self.chat_request(chunk_text)).await?;
                payload.summary()
            }
            Backend::Completion => {
                let payload: CompletionResponse =
                    self.post(&self.completion_request(chunk_text)).await?;
                payload.summary()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn summary(&self) -> Result<String> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .map(str::to_string)
            .context("OpenAI response did not contain choices[0].message.content")
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: Option<String>,
}

impl CompletionResponse {
    fn summary(&self) -> Result<String> {
        self.choices
            .first()
            .and_then(|c| c.text.as_deref())
            .map(str::trim)
            .map(str::to_string)
            .context("OpenAI response did not contain choices[0].text")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarizer(backend: Backend) -> OpenAiSummarizer {
        let mut settings = Settings::default();
        settings.llm.api_key = "sk-test".to_string();
        settings.llm.backend = backend;
        settings.llm.endpoint = "http://localhost:8080/".to_string();
        OpenAiSummarizer::from_settings(&settings).unwrap()
    }

    #[test]
    fn urls_follow_backend() {
        assert_eq!(
            summarizer(Backend::Chat).request_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(
            summarizer(Backend::Completion).request_url(),
            "http://localhost:8080/v1/completions"
        );
    }

    #[test]
    fn chat_request_sends_single_user_message() {
        let body = serde_json::to_value(summarizer(Backend::Chat).chat_request("Patient: 40.\n"))
            .unwrap();

        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body["messages"][0]["content"]
            .as_str()
            .unwrap()
            .ends_with("\nPatient: 40.\n"));
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn completion_request_caps_output_tokens() {
        let body = serde_json::to_value(
            summarizer(Backend::Completion).completion_request("Patient: 40.\n"),
        )
        .unwrap();

        assert_eq!(body["model"], "text-davinci-003");
        assert_eq!(body["max_tokens"], 150);
        assert!(body["prompt"].as_str().unwrap().contains("Patient: 40.\n"));
    }

    #[test]
    fn extracts_chat_message_content() {
        let payload: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Age: 40\n"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.summary().unwrap(), "Age: 40");
    }

    #[test]
    fn extracts_completion_text() {
        let payload: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"text":"\n\nLocation: Leeds","index":0}]}"#,
        )
        .unwrap();
        assert_eq!(payload.summary().unwrap(), "Location: Leeds");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let payload: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        let err = payload.summary().unwrap_err().to_string();
        assert!(err.contains("choices[0].message.content"));

        let payload: CompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(payload.summary().is_err());
    }

    #[test]
    fn blank_endpoint_uses_default() {
        let mut settings = Settings::default();
        settings.llm.api_key = "sk-test".to_string();
        settings.llm.endpoint = "  ".to_string();

        let summarizer = OpenAiSummarizer::from_settings(&settings).unwrap();
        assert_eq!(
            summarizer.request_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
