//! Tokenizer module for carechunk
//!
//! Wraps the tiktoken BPE vocabularies behind a small codec trait so the
//! chunker can be driven by either vocabulary (or a fake one in tests).

use serde::{Deserialize, Serialize};
use tiktoken_rs::CoreBPE;

use crate::{CarechunkError, Result};

/// Opaque sub-word id produced by a vocabulary.
pub type Token = usize;

/// Reversible text <-> token conversion.
pub trait TokenCodec {
    /// Encode text into tokens. Special-token markup is treated as plain text.
    fn encode(&self, text: &str) -> Vec<Token>;

    /// Decode a run of tokens. Byte sequences cut mid-character are replaced
    /// with U+FFFD.
    fn decode(&self, tokens: &[Token]) -> String;

    /// Raw bytes of a single token.
    fn decode_single(&self, token: Token) -> Vec<u8>;
}

/// BPE vocabulary to tokenize with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    /// Vocabulary of chat-style models (gpt-3.5-turbo, gpt-4)
    Cl100kBase,
    /// Vocabulary of completion-style models (text-davinci-002/003)
    P50kBase,
}

impl Vocabulary {
    pub fn name(&self) -> &'static str {
        match self {
            Vocabulary::Cl100kBase => "cl100k_base",
            Vocabulary::P50kBase => "p50k_base",
        }
    }
}

/// tiktoken-backed tokenizer
pub struct Tokenizer {
    bpe: CoreBPE,
    vocabulary: Vocabulary,
}

impl Tokenizer {
    /// Load the BPE ranks for a vocabulary.
    pub fn new(vocabulary: Vocabulary) -> Result<Self> {
        let bpe = match vocabulary {
            Vocabulary::Cl100kBase => tiktoken_rs::cl100k_base(),
            Vocabulary::P50kBase => tiktoken_rs::p50k_base(),
        }
        .map_err(|e| {
            CarechunkError::Tokenizer(format!("failed to load {}: {}", vocabulary.name(), e))
        })?;

        tracing::debug!("Loaded {} vocabulary", vocabulary.name());

        Ok(Self { bpe, vocabulary })
    }

    pub fn vocabulary(&self) -> Vocabulary {
        self.vocabulary
    }
}

impl TokenCodec for Tokenizer {
    fn encode(&self, text: &str) -> Vec<Token> {
        self.bpe.encode_ordinary(text)
    }

    fn decode(&self, tokens: &[Token]) -> String {
        String::from_utf8_lossy(&self.bpe._decode_native(tokens)).into_owned()
    }

    fn decode_single(&self, token: Token) -> Vec<u8> {
        self.bpe._decode_native(&[token])
    }
}
