//! Transcript segmentation: tokenizer plus chunker for one backend

use serde::Serialize;

use crate::backend::Backend;
use crate::chunking::{Chunk, Chunker, FlushReason};
use crate::tokenizer::{Token, TokenCodec, Tokenizer};
use crate::Result;

/// Splits transcripts into chunks using the backend's vocabulary and
/// turn-boundary heuristic.
pub struct Segmenter {
    backend: Backend,
    tokenizer: Tokenizer,
    chunker: Chunker,
}

/// Dry-run view of one chunk
#[derive(Debug, Clone, Serialize)]
pub struct ChunkPreview {
    pub number: usize,
    pub token_count: usize,
    pub reason: FlushReason,
    pub text: String,
}

/// Dry-run view of one transcript
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptPreview {
    /// 1-based position in the input file
    pub transcript: usize,
    pub token_count: usize,
    pub chunks: Vec<ChunkPreview>,
}

impl Segmenter {
    pub fn new(backend: Backend, max_tokens: usize) -> Result<Self> {
        let tokenizer = Tokenizer::new(backend.vocabulary())?;
        let chunker = Chunker::new(max_tokens, backend.turn_boundary())?;

        tracing::debug!(
            "Segmenting for {} backend: {} vocabulary, max {} tokens per chunk",
            backend,
            tokenizer.vocabulary().name(),
            chunker.max_tokens()
        );

        Ok(Self {
            backend,
            tokenizer,
            chunker,
        })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn encode(&self, transcript: &str) -> Vec<Token> {
        self.tokenizer.encode(transcript)
    }

    /// Chunk an already-encoded transcript.
    pub fn split(&mut self, tokens: &[Token]) -> Vec<Chunk> {
        self.chunker.split(&self.tokenizer, tokens)
    }

    /// Lazily chunk an already-encoded transcript, decoding each chunk as it
    /// is flushed.
    pub fn chunks<'a>(
        &'a mut self,
        tokens: &'a [Token],
    ) -> impl Iterator<Item = (Chunk, String)> + 'a {
        let tokenizer = &self.tokenizer;
        self.chunker.stream(tokenizer, tokens).map(move |chunk| {
            let text = tokenizer.decode(&chunk.tokens);
            (chunk, text)
        })
    }

    pub fn decode(&self, chunk: &Chunk) -> String {
        self.tokenizer.decode(&chunk.tokens)
    }

    /// Chunk a transcript and decode every chunk, without summarizing.
    pub fn preview(&mut self, transcript_number: usize, transcript: &str) -> TranscriptPreview {
        let tokens = self.encode(transcript);
        let chunks = self
            .split(&tokens)
            .iter()
            .map(|chunk| ChunkPreview {
                number: chunk.number,
                token_count: chunk.len(),
                reason: chunk.reason,
                text: self.decode(chunk),
            })
            .collect();

        TranscriptPreview {
            transcript: transcript_number,
            token_count: tokens.len(),
            chunks,
        }
    }
}
