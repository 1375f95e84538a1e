//! Resilient LLM summarizer with recursive split/merge
//!
//! Tries one direct generation call first. On context overflow it splits the
//! entry list at the midpoint, summarizes each half with the same
//! instructions, and synthesizes the partial summaries with a second call;
//! the combine step itself halves the summary list on overflow. The base
//! case of a single oversized entry splits the entry's text at its character
//! midpoint and recurses, bottoming out at a truncation floor so the
//! recursion always terminates.

use crate::errors::{ContextError, Result};
use crate::generator::{self, GeneratorFactory};
use crate::locale::Locale;
use crate::summarize::Summarizer;
use crate::transcript::Entry;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tracing::debug;

/// Below this midpoint length the text is truncated instead of split further
const SPLIT_FLOOR_CHARS: usize = 100;

/// Length of the truncated stand-in at the recursion floor
const TRUNCATION_CHARS: usize = 500;

const DEFAULT_SUMMARIZATION_INSTRUCTIONS: &str = "Summarize the following conversation briefly, \
preserving only essential facts and decisions. Remove examples, repetition, and implementation \
details. Provide only the summary content directly without any introductory phrases, \
explanations, or meta-commentary. Start immediately with the summary.";

/// Default summarizer implementation driving a [`GeneratorFactory`]
pub struct LlmSummarizer {
    factory: Arc<dyn GeneratorFactory>,
}

impl LlmSummarizer {
    /// Create a summarizer that runs its generation calls through `factory`
    pub fn new(factory: Arc<dyn GeneratorFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(
        &self,
        entries: &[Entry],
        instructions: Option<&str>,
        locale: &Locale,
    ) -> Result<String> {
        if entries.is_empty() {
            return Err(ContextError::EmptyInput);
        }

        if !locale.is_default() && instructions.is_none() {
            return Err(ContextError::MissingLocaleInstructions {
                locale: locale.identifier().to_string(),
            });
        }

        let instructions = instructions.unwrap_or(DEFAULT_SUMMARIZATION_INSTRUCTIONS);
        self.summarize_with_retry(entries, instructions).await
    }
}

impl LlmSummarizer {
    /// Summarize entries, splitting automatically on context overflow
    fn summarize_with_retry<'a>(
        &'a self,
        entries: &'a [Entry],
        instructions: &'a str,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            match self.summarize_directly(entries, instructions).await {
                Ok(summary) => Ok(summary),
                Err(err) if err.is_context_overflow() => {
                    debug!(entries = entries.len(), "summarization overflowed, splitting");
                    self.summarize_in_parts(entries, instructions).await
                }
                Err(err) => Err(err),
            }
        })
    }

    /// One direct generation call over the concatenated entry text
    async fn summarize_directly(&self, entries: &[Entry], instructions: &str) -> Result<String> {
        let conversation_text = entries
            .iter()
            .filter_map(Entry::text)
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            "{}\n\nConversation to summarize:\n{}\n\nProvide the summary now (no introductory phrases):",
            instructions, conversation_text
        );

        generator::generate_once(self.factory.as_ref(), &prompt).await
    }

    /// Split the entry list at its midpoint, summarize each half, combine
    async fn summarize_in_parts(&self, entries: &[Entry], instructions: &str) -> Result<String> {
        let midpoint = entries.len() / 2;
        if midpoint == 0 {
            // Single entry whose text alone overflows
            return self.summarize_large_entry(&entries[0], instructions).await;
        }

        let (first_half, second_half) = entries.split_at(midpoint);

        let first_summary = self.summarize_with_retry(first_half, instructions).await?;
        let second_summary = self.summarize_with_retry(second_half, instructions).await?;

        self.combine_summaries(&[first_summary, second_summary]).await
    }

    /// A single entry too large for the window: split its text in half
    async fn summarize_large_entry(&self, entry: &Entry, instructions: &str) -> Result<String> {
        let Some(text) = entry.text() else {
            return Ok(String::new());
        };

        let (first_half, second_half) = split_at_char_midpoint(&text);

        let first_summary = self.summarize_text(&first_half, instructions).await?;
        let second_summary = self.summarize_text(&second_half, instructions).await?;

        self.combine_summaries(&[first_summary, second_summary]).await
    }

    /// Summarize raw text, halving it on overflow down to the truncation floor
    fn summarize_text<'a>(
        &'a self,
        text: &'a str,
        instructions: &'a str,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let prompt = format!(
                "{}\n\nText to summarize:\n{}\n\nProvide the summary now (no introductory phrases):",
                instructions, text
            );

            match generator::generate_once(self.factory.as_ref(), &prompt).await {
                Ok(summary) => Ok(summary),
                Err(err) if err.is_context_overflow() => {
                    let midpoint = text.chars().count() / 2;
                    if midpoint <= SPLIT_FLOOR_CHARS {
                        // Stability floor: truncate instead of recursing further
                        let truncated: String = text.chars().take(TRUNCATION_CHARS).collect();
                        return Ok(truncated + "...");
                    }

                    let (first_half, second_half) = split_at_char_midpoint(text);
                    let first_summary = self.summarize_text(&first_half, instructions).await?;
                    let second_summary = self.summarize_text(&second_half, instructions).await?;

                    self.combine_summaries(&[first_summary, second_summary]).await
                }
                Err(err) => Err(err),
            }
        })
    }

    /// Synthesize partial summaries into one, halving the list on overflow
    fn combine_summaries<'a>(&'a self, summaries: &'a [String]) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let combined_text = summaries
                .iter()
                .enumerate()
                .map(|(index, summary)| format!("Part {}:\n{}", index + 1, summary))
                .collect::<Vec<_>>()
                .join("\n\n");

            let prompt = format!(
                "Combine and synthesize the following summaries into a single coherent summary. \
                 Preserve all important information and maintain chronological flow. Provide only \
                 the combined summary content directly without any introductory phrases.\n\n\
                 Summaries to combine:\n{}\n\nCombined summary (no introductory phrases):",
                combined_text
            );

            match generator::generate_once(self.factory.as_ref(), &prompt).await {
                Ok(summary) => Ok(summary),
                Err(err) if err.is_context_overflow() => {
                    let midpoint = summaries.len() / 2;
                    if midpoint == 0 {
                        // One summary that alone overflows the combine call
                        return Ok(summaries[0].clone());
                    }

                    let (first_group, second_group) = summaries.split_at(midpoint);
                    let first_combined = self.combine_summaries(first_group).await?;
                    let second_combined = self.combine_summaries(second_group).await?;

                    self.combine_summaries(&[first_combined, second_combined]).await
                }
                Err(err) => Err(err),
            }
        })
    }
}

/// Split text at its character midpoint, respecting char boundaries
fn split_at_char_midpoint(text: &str) -> (String, String) {
    let chars: Vec<char> = text.chars().collect();
    let midpoint = chars.len() / 2;
    (
        chars[..midpoint].iter().collect(),
        chars[midpoint..].iter().collect(),
    )
}
