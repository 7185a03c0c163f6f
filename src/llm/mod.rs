//! LLM module for carechunk
//!
//! Sends chunk text to an OpenAI-compatible completion service and returns
//! the extracted demographic and health details.

mod client;
mod openai;
pub mod prompts;

pub use client::{build_summarizer, Summarizer};
pub use openai::OpenAiSummarizer;
