//! Resilient LLM state extractor with recursive split/merge
//!
//! Mirrors the summarizer's divide-and-conquer: one direct extraction call,
//! midpoint split on context overflow, recursive extraction of each half,
//! then a pure merge of the partial states (no further model call). A
//! single oversized entry has its text split into two synthetic prompt
//! entries; below the split floor the text is truncated and extracted once,
//! degrading to an empty state if even that overflows.

use crate::errors::Result;
use crate::generator::{self, GeneratorFactory};
use crate::state::{StateExtractor, StructuredState};
use crate::transcript::Entry;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tracing::debug;

/// Below this midpoint length the text is truncated instead of split further
const SPLIT_FLOOR_CHARS: usize = 100;

/// Length of the truncated stand-in at the recursion floor
const TRUNCATION_CHARS: usize = 500;

/// Default state extractor implementation driving a [`GeneratorFactory`]
pub struct LlmStateExtractor {
    factory: Arc<dyn GeneratorFactory>,
}

impl LlmStateExtractor {
    /// Create an extractor that runs its generation calls through `factory`
    pub fn new(factory: Arc<dyn GeneratorFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl StateExtractor for LlmStateExtractor {
    async fn extract_state(&self, entries: &[Entry]) -> Result<StructuredState> {
        if entries.is_empty() {
            return Ok(StructuredState::default());
        }

        self.extract_with_retry(entries).await
    }
}

impl LlmStateExtractor {
    /// Extract state, splitting automatically on context overflow
    fn extract_with_retry<'a>(
        &'a self,
        entries: &'a [Entry],
    ) -> BoxFuture<'a, Result<StructuredState>> {
        Box::pin(async move {
            match self.extract_directly(entries).await {
                Ok(state) => Ok(state),
                Err(err) if err.is_context_overflow() => {
                    debug!(entries = entries.len(), "extraction overflowed, splitting");
                    self.extract_in_parts(entries).await
                }
                Err(err) => Err(err),
            }
        })
    }

    /// One direct extraction call requesting key-value facts as JSON
    async fn extract_directly(&self, entries: &[Entry]) -> Result<StructuredState> {
        let conversation_text = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry.text() {
                Some(text) => format!("[Entry {}]: {}", index, text),
                None => format!("[Entry {}]: (non-text entry)", index),
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            "Analyze the following conversation and extract all important information as key-value pairs.\n\n\
             Use descriptive keys that indicate the type of information:\n\
             - For facts: use simple keys like \"name\", \"date\", \"time\", \"preference\", \"quantity\"\n\
             - For constraints: prefix with \"constraint_\" (e.g., \"constraint_quiet_table\", \"constraint_gluten_free\")\n\
             - For decisions: prefix with \"decision_\" (e.g., \"decision_reservation_time\", \"decision_api_version\")\n\
             - For other important info: use descriptive keys\n\n\
             Be concise but complete. Only include information that would be useful for future conversation turns.\n\n\
             Respond with JSON of the form {{\"facts\": [{{\"key\": \"...\", \"value\": \"...\"}}]}}.\n\n\
             Conversation:\n{}",
            conversation_text
        );

        let response = generator::generate_once(self.factory.as_ref(), &prompt).await?;
        Ok(parse_state(&response))
    }

    /// Split the entry list at its midpoint, extract each half, merge
    async fn extract_in_parts(&self, entries: &[Entry]) -> Result<StructuredState> {
        if entries.len() <= 1 {
            return self.extract_from_single_entry(&entries[0]).await;
        }

        let midpoint = entries.len() / 2;
        let (first_half, second_half) = entries.split_at(midpoint);

        let first_state = self.extract_with_retry(first_half).await?;
        let second_state = self.extract_with_retry(second_half).await?;

        Ok(StructuredState::merged(&[first_state, second_state]))
    }

    /// A single entry too large for the window: split its text into two
    /// synthetic prompt entries and extract from each.
    fn extract_from_single_entry<'a>(
        &'a self,
        entry: &'a Entry,
    ) -> BoxFuture<'a, Result<StructuredState>> {
        Box::pin(async move {
            let Some(text) = entry.text() else {
                return Ok(StructuredState::default());
            };

            let midpoint = text.chars().count() / 2;
            if midpoint <= SPLIT_FLOOR_CHARS {
                // Termination floor: truncate and try once; an overflow even
                // here degrades to an empty state rather than recursing.
                let truncated: String = text.chars().take(TRUNCATION_CHARS).collect();
                return match self.extract_directly(&[Entry::prompt(truncated)]).await {
                    Ok(state) => Ok(state),
                    Err(err) if err.is_context_overflow() => Ok(StructuredState::default()),
                    Err(err) => Err(err),
                };
            }

            let chars: Vec<char> = text.chars().collect();
            let first_half: String = chars[..midpoint].iter().collect();
            let second_half: String = chars[midpoint..].iter().collect();

            let first_state = self
                .extract_with_retry(&[Entry::prompt(first_half)])
                .await?;
            let second_state = self
                .extract_with_retry(&[Entry::prompt(second_half)])
                .await?;

            Ok(StructuredState::merged(&[first_state, second_state]))
        })
    }
}

/// Parse the model's JSON state response, tolerating fences and prose.
/// Malformed output degrades to an empty state.
fn parse_state(response: &str) -> StructuredState {
    let Some(start) = response.find('{') else {
        return StructuredState::default();
    };
    let Some(end) = response.rfind('}') else {
        return StructuredState::default();
    };
    if end < start {
        return StructuredState::default();
    }

    match serde_json::from_str::<StructuredState>(&response[start..=end]) {
        Ok(state) => state,
        Err(err) => {
            debug!(error = %err, "unusable state extraction response");
            StructuredState::default()
        }
    }
}
