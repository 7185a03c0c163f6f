//! Summarization run over a batch of transcripts

use anyhow::Result;
use std::io::Write;

use crate::config::Settings;
use crate::llm::Summarizer;
use crate::pipeline::segmenter::Segmenter;

/// A chunk whose summarization call failed
#[derive(Debug, Clone)]
pub struct ChunkFailure {
    /// 1-based transcript position in the input file
    pub transcript: usize,
    /// 1-based chunk number within that transcript
    pub chunk: usize,
    pub error: String,
}

/// Outcome of a run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub transcripts: usize,
    pub chunks: usize,
    pub summarized: usize,
    pub failures: Vec<ChunkFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Chunks each transcript and summarizes the chunks one at a time.
pub struct SummaryPipeline {
    segmenter: Segmenter,
    summarizer: Box<dyn Summarizer>,
}

impl SummaryPipeline {
    pub fn new(settings: &Settings, summarizer: Box<dyn Summarizer>) -> Result<Self> {
        let segmenter = Segmenter::new(settings.llm.backend, settings.chunking.max_tokens)?;
        Ok(Self::with_segmenter(segmenter, summarizer))
    }

    pub fn with_segmenter(segmenter: Segmenter, summarizer: Box<dyn Summarizer>) -> Self {
        Self {
            segmenter,
            summarizer,
        }
    }

    /// Summarize every chunk of every transcript, writing marker-delimited
    /// summaries to `out`.
    ///
    /// A failed summarization is written in place of the summary and recorded
    /// in the report; the run carries on with the next chunk. Only write
    /// errors on `out` abort the run.
    pub async fn run<W: Write>(&mut self, transcripts: &[String], out: &mut W) -> Result<RunReport> {
        let backend = self.segmenter.backend();
        let mut report = RunReport::default();

        for (index, transcript) in transcripts.iter().enumerate() {
            let transcript_number = index + 1;
            let tokens = self.segmenter.encode(transcript);
            let mut chunk_count = 0;

            for (chunk, text) in self.segmenter.chunks(&tokens) {
                writeln!(out, "{}", backend.begin_marker(chunk.number))?;
                tracing::debug!(
                    "Summarizing transcript {} chunk {} ({} tokens, {})",
                    transcript_number,
                    chunk.number,
                    chunk.len(),
                    chunk.reason.as_str()
                );

                match self.summarizer.summarize(&text).await {
                    Ok(summary) => {
                        writeln!(out, "{}", summary)?;
                        report.summarized += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Transcript {} chunk {} failed: {:#}",
                            transcript_number,
                            chunk.number,
                            e
                        );
                        writeln!(out, "[error] {:#}", e)?;
                        report.failures.push(ChunkFailure {
                            transcript: transcript_number,
                            chunk: chunk.number,
                            error: format!("{:#}", e),
                        });
                    }
                }

                writeln!(out, "{}", backend.end_marker(chunk.number))?;
                out.flush()?;
                chunk_count += 1;
            }

            tracing::info!(
                "Transcript {}: {} tokens in {} chunks",
                transcript_number,
                tokens.len(),
                chunk_count
            );
            report.chunks += chunk_count;
            report.transcripts += 1;
        }

        Ok(report)
    }
}
