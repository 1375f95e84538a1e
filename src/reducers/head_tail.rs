//! Head-tail window reduction
//!
//! Always preserves the head (all instruction entries) plus the most recent
//! conversation entries (tail), dropping everything in between. Unlike the
//! sliding window there is no way to drop instructions.

use crate::errors::Result;
use crate::reducers::{tail, ContextReducer};
use crate::transcript::Transcript;
use async_trait::async_trait;

/// Default number of tail conversation entries to keep
pub const DEFAULT_TAIL_TURNS: usize = 2;

/// Keeps all instructions plus the most recent conversation entries
pub struct HeadTailWindowReducer {
    tail_turns: usize,
}

impl HeadTailWindowReducer {
    /// Create a head-tail reducer keeping `tail_turns` conversation entries
    pub fn new(tail_turns: usize) -> Self {
        Self { tail_turns }
    }
}

impl Default for HeadTailWindowReducer {
    fn default() -> Self {
        Self::new(DEFAULT_TAIL_TURNS)
    }
}

#[async_trait]
impl ContextReducer for HeadTailWindowReducer {
    async fn reduce(&self, transcript: &Transcript) -> Result<Transcript> {
        let (instructions, conversation) = transcript.partition_instructions();

        let mut new_entries = instructions;
        new_entries.extend(tail(&conversation, self.tail_turns));

        Ok(Transcript::new(new_entries))
    }
}
