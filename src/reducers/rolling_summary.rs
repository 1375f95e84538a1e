//! Rolling summary reduction
//!
//! Replaces older conversation history with a single running summary entry
//! while keeping the most recent turns verbatim.

use crate::errors::Result;
use crate::reducers::{tail, ContextReducer};
use crate::summarize::RollingSummaryConfiguration;
use crate::transcript::{Entry, Transcript};
use async_trait::async_trait;

/// Prefix of the synthesized summary entry
pub const SUMMARY_PREFIX: &str = "Summary of previous conversation: ";

/// Summarizes all but the most recent conversation entries
pub struct RollingSummaryReducer {
    configuration: RollingSummaryConfiguration,
}

impl RollingSummaryReducer {
    /// Create a rolling summary reducer with the given configuration
    pub fn new(configuration: RollingSummaryConfiguration) -> Self {
        Self { configuration }
    }
}

#[async_trait]
impl ContextReducer for RollingSummaryReducer {
    async fn reduce(&self, transcript: &Transcript) -> Result<Transcript> {
        let (instructions, conversation) = transcript.partition_instructions();

        let mut new_entries = Vec::new();
        if self.configuration.keep_instructions {
            new_entries.extend(instructions);
        }

        let keep = self.configuration.recent_turns_to_keep;
        let split = conversation.len().saturating_sub(keep);
        let to_summarize = &conversation[..split];
        let recent = tail(&conversation, keep);

        if !to_summarize.is_empty() {
            let summary_text = self
                .configuration
                .summarizer
                .summarize(
                    to_summarize,
                    self.configuration.summarization_instructions.as_deref(),
                    &self.configuration.locale,
                )
                .await?;

            new_entries.push(Entry::prompt(format!("{}{}", SUMMARY_PREFIX, summary_text)));
        }

        new_entries.extend(recent);

        Ok(Transcript::new(new_entries))
    }
}
