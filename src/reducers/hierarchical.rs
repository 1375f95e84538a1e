//! Hierarchical summary reduction
//!
//! Maintains summaries at multiple granularities: for each configured level
//! one summary entry is appended, labeled with the level's name. `Global`
//! summarizes all older entries at once; `PerTurn` summarizes each
//! conversation turn separately; `PerTopic` groups older entries with the
//! topic detector and summarizes each group.

use crate::errors::Result;
use crate::reducers::{tail, ContextReducer};
use crate::summarize::{HierarchicalSummaryConfiguration, SummaryGranularity};
use crate::transcript::{Entry, Transcript};
use async_trait::async_trait;

/// Produces one labeled summary entry per granularity level
pub struct HierarchicalSummaryReducer {
    configuration: HierarchicalSummaryConfiguration,
}

impl HierarchicalSummaryReducer {
    /// Create a hierarchical summary reducer with the given configuration
    pub fn new(configuration: HierarchicalSummaryConfiguration) -> Self {
        Self { configuration }
    }

    async fn create_summary(
        &self,
        entries: &[Entry],
        granularity: SummaryGranularity,
    ) -> Result<String> {
        let config = &self.configuration;
        let instructions = config.summarization_instructions.as_deref();

        match granularity {
            SummaryGranularity::Global => {
                config
                    .summarizer
                    .summarize(entries, instructions, &config.locale)
                    .await
            }
            SummaryGranularity::PerTurn => {
                let mut turn_summaries = Vec::new();
                for turn in group_into_turns(entries) {
                    let summary = config
                        .summarizer
                        .summarize(&turn, instructions, &config.locale)
                        .await?;
                    turn_summaries.push(summary);
                }
                Ok(turn_summaries.join("\n\n"))
            }
            SummaryGranularity::PerTopic => {
                let topic_groups = config.topic_detector.detect_topics(entries).await?;

                let mut topic_summaries = Vec::new();
                for (index, group) in topic_groups.iter().enumerate() {
                    let summary = config
                        .summarizer
                        .summarize(group, instructions, &config.locale)
                        .await?;
                    topic_summaries.push(format!("Topic {}: {}", index + 1, summary));
                }
                Ok(topic_summaries.join("\n\n"))
            }
        }
    }
}

#[async_trait]
impl ContextReducer for HierarchicalSummaryReducer {
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
            for granularity in &self.configuration.granularity_levels {
                let summary_text = self.create_summary(to_summarize, *granularity).await?;
                new_entries.push(Entry::prompt(format!(
                    "{} Summary: {}",
                    granularity.label(),
                    summary_text
                )));
            }
        }

        new_entries.extend(recent);

        Ok(Transcript::new(new_entries))
    }
}

/// Group conversation entries into turns.
///
/// A turn starts at a `Prompt` and closes after the next `Response`;
/// non-prompt entries accumulate into the currently open turn.
fn group_into_turns(entries: &[Entry]) -> Vec<Vec<Entry>> {
    let mut turns: Vec<Vec<Entry>> = Vec::new();
    let mut current_turn: Vec<Entry> = Vec::new();

    for entry in entries {
        match entry {
            Entry::Prompt { .. } => {
                if !current_turn.is_empty() {
                    turns.push(std::mem::take(&mut current_turn));
                }
                current_turn.push(entry.clone());
            }
            Entry::Response { .. } => {
                current_turn.push(entry.clone());
                turns.push(std::mem::take(&mut current_turn));
            }
            _ => current_turn.push(entry.clone()),
        }
    }

    if !current_turn.is_empty() {
        turns.push(current_turn);
    }

    turns
}
