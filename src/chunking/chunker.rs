//! Token-bounded, turn-aware chunking

use serde::Serialize;

use crate::chunking::boundary::TurnBoundary;
use crate::tokenizer::{Token, TokenCodec};
use crate::{CarechunkError, Result};

/// Why a chunk was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushReason {
    /// The turn-boundary predicate held after the last appended token
    TurnBoundary,
    /// The chunk was full when the next token arrived
    MaxTokens,
    /// Remainder flushed after the last token of the transcript
    EndOfTranscript,
}

impl FlushReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlushReason::TurnBoundary => "turn-boundary",
            FlushReason::MaxTokens => "max-tokens",
            FlushReason::EndOfTranscript => "end-of-transcript",
        }
    }
}

/// A run of consecutive transcript tokens sent to the summarizer as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// 1-based position of the chunk within its transcript
    pub number: usize,
    pub tokens: Vec<Token>,
    pub reason: FlushReason,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Splits token sequences into chunks of at most `max_tokens`, closing a
/// chunk early when the turn-boundary predicate holds.
pub struct Chunker {
    max_tokens: usize,
    boundary: Box<dyn TurnBoundary>,
}

impl Chunker {
    pub fn new(max_tokens: usize, boundary: Box<dyn TurnBoundary>) -> Result<Self> {
        if max_tokens == 0 {
            return Err(CarechunkError::Config(
                "chunking.max_tokens must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            max_tokens,
            boundary,
        })
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Lazily chunk one transcript's tokens. Numbering starts again at 1.
    pub fn stream<'a>(
        &'a mut self,
        codec: &'a dyn TokenCodec,
        tokens: &'a [Token],
    ) -> ChunkStream<'a> {
        self.boundary.reset();

        ChunkStream {
            tokens: tokens.iter(),
            codec,
            boundary: self.boundary.as_mut(),
            max_tokens: self.max_tokens,
            current: Vec::new(),
            next_number: 1,
            state: StreamState::Accumulating,
        }
    }

    /// Chunk one transcript's tokens eagerly.
    pub fn split(&mut self, codec: &dyn TokenCodec, tokens: &[Token]) -> Vec<Chunk> {
        self.stream(codec, tokens).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Accumulating,
    Done,
}

/// Iterator over the chunks of one transcript.
///
/// Always yields a final `EndOfTranscript` chunk, which is empty when the
/// last token closed the previous chunk.
pub struct ChunkStream<'a> {
    tokens: std::slice::Iter<'a, Token>,
    codec: &'a dyn TokenCodec,
    boundary: &'a mut dyn TurnBoundary,
    max_tokens: usize,
    current: Vec<Token>,
    next_number: usize,
    state: StreamState,
}

impl ChunkStream<'_> {
    fn flush(&mut self, reason: FlushReason) -> Chunk {
        let chunk = Chunk {
            number: self.next_number,
            tokens: std::mem::take(&mut self.current),
            reason,
        };
        self.next_number += 1;
        self.boundary.reset();

        tracing::trace!(
            "Flushed chunk {} ({} tokens, {})",
            chunk.number,
            chunk.len(),
            reason.as_str()
        );

        chunk
    }

    fn push(&mut self, token: Token) {
        self.current.push(token);
        self.boundary.observe(&self.codec.decode_single(token));
    }
}

impl Iterator for ChunkStream<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.state == StreamState::Done {
            return None;
        }

        while let Some(&token) = self.tokens.next() {
            if self.current.len() < self.max_tokens {
                self.push(token);
                if self.boundary.is_met() {
                    return Some(self.flush(FlushReason::TurnBoundary));
                }
            } else {
                // The overflowing token opens the next chunk; it is only
                // tested together with the token appended after it.
                let chunk = self.flush(FlushReason::MaxTokens);
                self.push(token);
                return Some(chunk);
            }
        }

        self.state = StreamState::Done;
        Some(self.flush(FlushReason::EndOfTranscript))
    }
}
