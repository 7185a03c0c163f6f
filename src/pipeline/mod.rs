//! Summarization pipeline for carechunk
//!
//! Drives tokenization, chunking and per-chunk summarization for a batch
//! of transcripts.

mod runner;
mod segmenter;

pub use runner::{ChunkFailure, RunReport, SummaryPipeline};
pub use segmenter::{ChunkPreview, Segmenter, TranscriptPreview};
