//! Chunking module for carechunk
//!
//! Splits tokenized transcripts into bounded chunks that try to end on a
//! completed doctor/patient exchange.

mod boundary;
mod chunker;

pub use boundary::{ChatTurnBoundary, CompletionTurnBoundary, TurnBoundary};
pub use chunker::{Chunk, ChunkStream, Chunker, FlushReason};
