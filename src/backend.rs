//! Completion backend selection
//!
//! The chat and completion backends share the whole pipeline and differ
//! only in the knobs exposed here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chunking::{ChatTurnBoundary, CompletionTurnBoundary, TurnBoundary};
use crate::tokenizer::Vocabulary;

/// Which completion API (and matching tokenizer heuristics) to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Chat completions (`/v1/chat/completions`)
    #[default]
    Chat,
    /// Legacy text completions (`/v1/completions`)
    Completion,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Chat => "chat",
            Backend::Completion => "completion",
        }
    }

    pub fn vocabulary(&self) -> Vocabulary {
        match self {
            Backend::Chat => Vocabulary::Cl100kBase,
            Backend::Completion => Vocabulary::P50kBase,
        }
    }

    pub fn turn_boundary(&self) -> Box<dyn TurnBoundary> {
        match self {
            Backend::Chat => Box::new(ChatTurnBoundary::new()),
            Backend::Completion => Box::new(CompletionTurnBoundary::new()),
        }
    }

    /// Line printed before a chunk's summary.
    pub fn begin_marker(&self, chunk_number: usize) -> String {
        match self {
            Backend::Chat => format!("[%--- Begin Chunk [Chunk {}] ---%]", chunk_number),
            Backend::Completion => "[%--- Begin Chunk ---%]".to_string(),
        }
    }

    /// Line printed after a chunk's summary.
    pub fn end_marker(&self, chunk_number: usize) -> String {
        match self {
            Backend::Chat => format!("[%--- End Chunk [Chunk {}] ---%]", chunk_number),
            Backend::Completion => "[%--- End Chunk ---%]".to_string(),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_markers_carry_chunk_number() {
        assert_eq!(Backend::Chat.begin_marker(3), "[%--- Begin Chunk [Chunk 3] ---%]");
        assert_eq!(Backend::Chat.end_marker(3), "[%--- End Chunk [Chunk 3] ---%]");
    }

    #[test]
    fn completion_markers_are_static() {
        assert_eq!(Backend::Completion.begin_marker(7), "[%--- Begin Chunk ---%]");
        assert_eq!(Backend::Completion.end_marker(7), "[%--- End Chunk ---%]");
    }

    #[test]
    fn backend_picks_vocabulary_and_boundary() {
        assert_eq!(Backend::Chat.vocabulary(), Vocabulary::Cl100kBase);
        assert_eq!(Backend::Completion.vocabulary(), Vocabulary::P50kBase);

        let mut chat = Backend::Chat.turn_boundary();
        assert!(chat.holds(&[b"?\n".as_slice(), b".\n".as_slice()]));

        let mut completion = Backend::Completion.turn_boundary();
        assert!(!completion.holds(&[b"?\n".as_slice(), b".\n".as_slice()]));
        assert!(completion.holds(&[b"\n".as_slice(), b"\n".as_slice()]));
    }
}
