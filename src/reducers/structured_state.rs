//! Structured state reduction
//!
//! Replaces older conversation history with one synthetic entry listing the
//! facts extracted from it, sorted by key, while keeping recent turns
//! verbatim.

use crate::errors::Result;
use crate::reducers::{tail, ContextReducer};
use crate::state::{StructuredState, StructuredStateConfiguration};
use crate::transcript::{Entry, Transcript};
use async_trait::async_trait;

/// Header of the synthesized state entry
pub const STATE_PREFIX: &str = "Structured state extracted from previous conversation:";

/// Extracts a structured state from all but the most recent entries
pub struct StructuredStateReducer {
    configuration: StructuredStateConfiguration,
}

impl StructuredStateReducer {
    /// Create a structured state reducer with the given configuration
    pub fn new(configuration: StructuredStateConfiguration) -> Self {
        Self { configuration }
    }
}

#[async_trait]
impl ContextReducer for StructuredStateReducer {
    async fn reduce(&self, transcript: &Transcript) -> Result<Transcript> {
        let (instructions, conversation) = transcript.partition_instructions();

        let mut new_entries = Vec::new();
        if self.configuration.keep_instructions {
            new_entries.extend(instructions);
        }

        let keep = self.configuration.recent_turns_to_keep;
        let split = conversation.len().saturating_sub(keep);
        let to_extract = &conversation[..split];
        let recent = tail(&conversation, keep);

        if !to_extract.is_empty() {
            let state = self
                .configuration
                .state_extractor
                .extract_state(to_extract)
                .await?;

            new_entries.push(Entry::prompt(format!(
                "{}\n\n{}",
                STATE_PREFIX,
                format_state(&state)
            )));
        }

        new_entries.extend(recent);

        Ok(Transcript::new(new_entries))
    }
}

/// Format the facts sorted by key as `  - key: value` lines
fn format_state(state: &StructuredState) -> String {
    if state.is_empty() {
        return "(no information extracted)".to_string();
    }

    let mut facts = state.facts.clone();
    facts.sort_by(|a, b| a.key.cmp(&b.key));

    facts
        .iter()
        .map(|fact| format!("  - {}: {}", fact.key, fact.value))
        .collect::<Vec<_>>()
        .join("\n")
}
