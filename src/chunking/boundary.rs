//! Turn-boundary predicates
//!
//! A predicate watches the decoded bytes of each token appended to the
//! current chunk and reports when the chunk holds a completed doctor turn
//! plus a completed patient turn. Matching is on whole token pieces, not on
//! substrings of the decoded text.

const QUESTION_END: &[u8] = b"?\n";
const STATEMENT_END: &[u8] = b".\n";
const NEWLINE: &[u8] = b"\n";

/// Heuristic end-of-exchange test for the chunk under construction.
///
/// Implementations keep running counts, so `observe` is called once per
/// appended token and `is_met` is cheap. `reset` is called whenever a chunk
/// is flushed.
pub trait TurnBoundary: Send {
    /// Record the byte piece of one appended token.
    fn observe(&mut self, piece: &[u8]);

    /// Whether the pieces observed since the last reset close an exchange.
    fn is_met(&self) -> bool;

    /// Forget everything observed so far.
    fn reset(&mut self);

    /// Evaluate the predicate from scratch over a full list of pieces.
    fn holds(&mut self, pieces: &[&[u8]]) -> bool {
        self.reset();
        for piece in pieces {
            self.observe(piece);
        }
        let met = self.is_met();
        self.reset();
        met
    }
}

/// Boundary for chat-vocabulary tokens, where sentence punctuation and the
/// following newline share a token.
///
/// Met by one question plus one statement, two statements, or two questions.
#[derive(Debug, Default, Clone)]
pub struct ChatTurnBoundary {
    questions: usize,
    statements: usize,
}

impl ChatTurnBoundary {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TurnBoundary for ChatTurnBoundary {
    fn observe(&mut self, piece: &[u8]) {
        if piece == QUESTION_END {
            self.questions += 1;
        } else if piece == STATEMENT_END {
            self.statements += 1;
        }
    }

    fn is_met(&self) -> bool {
        (self.questions >= 1 && self.statements >= 1) || self.statements >= 2 || self.questions >= 2
    }

    fn reset(&mut self) {
        self.questions = 0;
        self.statements = 0;
    }
}

/// Boundary for completion-vocabulary tokens, where newlines stand alone.
///
/// Met once two bare newline tokens have been seen.
#[derive(Debug, Default, Clone)]
pub struct CompletionTurnBoundary {
    newlines: usize,
}

impl CompletionTurnBoundary {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TurnBoundary for CompletionTurnBoundary {
    fn observe(&mut self, piece: &[u8]) {
        if piece == NEWLINE {
            self.newlines += 1;
        }
    }

    fn is_met(&self) -> bool {
        self.newlines >= 2
    }

    fn reset(&mut self) {
        self.newlines = 0;
    }
}
