//! Topic detection over conversation history
//!
//! Groups entries by inferred topic. Output is always a partition of the
//! input: every entry appears in exactly one group, and a non-empty input
//! yields a non-empty grouping.

pub mod llm;

pub use llm::LlmTopicDetector;

use crate::errors::Result;
use crate::transcript::Entry;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Strategy interface for grouping conversation entries by topic
#[async_trait]
pub trait TopicDetector: Send + Sync {
    /// Detect topics and group the entries accordingly.
    ///
    /// The returned groups partition the input: no duplication, no omission.
    async fn detect_topics(&self, entries: &[Entry]) -> Result<Vec<Vec<Entry>>>;
}

/// One topic group as returned by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicGroup {
    /// Model-assigned topic label
    pub topic: String,

    /// Indices into the input entry list claimed by this topic
    pub entry_indices: Vec<usize>,
}

/// Wire shape of the model's topic detection response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDetectionResponse {
    pub topics: Vec<TopicGroup>,
}
