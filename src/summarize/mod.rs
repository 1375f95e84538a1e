//! Summarization of conversation history
//!
//! The [`Summarizer`] trait turns a list of entries into prose. The default
//! [`LlmSummarizer`] survives oversized input by recursively splitting
//! entries (then text, then summary lists) and merging partial summaries.

pub mod config;
pub mod llm;

pub use config::{HierarchicalSummaryConfiguration, RollingSummaryConfiguration, SummaryGranularity};
pub use llm::LlmSummarizer;

use crate::errors::Result;
use crate::locale::Locale;
use crate::transcript::Entry;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::sync::Arc;

/// Strategy interface for summarizing conversation entries
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize the entries into a single prose summary.
    ///
    /// Fails with `EmptyInput` for an empty entry list, and with
    /// `MissingLocaleInstructions` when a non-default locale is requested
    /// without explicit instructions.
    async fn summarize(
        &self,
        entries: &[Entry],
        instructions: Option<&str>,
        locale: &Locale,
    ) -> Result<String>;
}

/// Boxed summarization function used by [`CustomSummarizer`]
pub type SummarizeFn =
    dyn Fn(Vec<Entry>, Option<String>, Locale) -> BoxFuture<'static, Result<String>> + Send + Sync;

/// A summarizer backed by a user-provided async function, for callers that
/// bring their own model or strategy.
#[derive(Clone)]
pub struct CustomSummarizer {
    function: Arc<SummarizeFn>,
}

impl CustomSummarizer {
    /// Wrap a summarization function
    pub fn new(function: Arc<SummarizeFn>) -> Self {
        Self { function }
    }
}

#[async_trait]
impl Summarizer for CustomSummarizer {
    async fn summarize(
        &self,
        entries: &[Entry],
        instructions: Option<&str>,
        locale: &Locale,
    ) -> Result<String> {
        (self.function)(
            entries.to_vec(),
            instructions.map(str::to_string),
            locale.clone(),
        )
        .await
    }
}
