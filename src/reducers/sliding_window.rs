//! Sliding window reduction
//!
//! Discards older conversation history, keeping only the most recent N
//! conversation entries, with optional preservation of instruction entries.

use crate::errors::Result;
use crate::reducers::{tail, ContextReducer};
use crate::transcript::Transcript;
use async_trait::async_trait;

/// Keeps only the most recent conversation turns
pub struct SlidingWindowReducer {
    turns: usize,
    keep_instructions: bool,
}

impl SlidingWindowReducer {
    /// Create a sliding window reducer keeping `turns` conversation entries.
    ///
    /// When `keep_instructions` is set, all instruction entries are kept
    /// regardless of `turns`, since instructions define the model's behavior.
    pub fn new(turns: usize, keep_instructions: bool) -> Self {
        Self {
            turns,
            keep_instructions,
        }
    }
}

#[async_trait]
impl ContextReducer for SlidingWindowReducer {
    async fn reduce(&self, transcript: &Transcript) -> Result<Transcript> {
        let (instructions, conversation) = transcript.partition_instructions();

        let mut new_entries = Vec::new();
        if self.keep_instructions {
            new_entries.extend(instructions);
        }
        new_entries.extend(tail(&conversation, self.turns));

        Ok(Transcript::new(new_entries))
    }
}
