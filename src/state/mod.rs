//! Structured state extraction from conversation history
//!
//! Replaces verbose conversation with an ordered list of key-value facts.
//! Keys follow fixed conventions: bare descriptive keys for facts,
//! `constraint_`-prefixed keys for constraints, `decision_`-prefixed keys
//! for decisions.

pub mod llm;

pub use llm::LlmStateExtractor;

use crate::errors::Result;
use crate::generator::GeneratorFactory;
use crate::locale::Locale;
use crate::transcript::Entry;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single extracted key-value fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFact {
    /// Key naming this piece of information (e.g. `name`,
    /// `constraint_quiet_table`, `decision_api_version`)
    pub key: String,

    /// The value of this piece of information
    pub value: String,
}

/// An ordered list of extracted facts with unique keys after merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredState {
    /// Extracted facts in encounter order
    pub facts: Vec<ExtractedFact>,
}

impl StructuredState {
    /// Create a state from a list of facts
    pub fn new(facts: Vec<ExtractedFact>) -> Self {
        Self { facts }
    }

    /// Whether the state holds no facts
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Merge several states into one.
    ///
    /// Facts are taken in encounter order. A new key is appended; an
    /// existing key with an identical value is kept once; an existing key
    /// with a differing value has the new value concatenated as
    /// `"<old>; <new>"` so conflicting information from both halves of a
    /// split is preserved.
    pub fn merged(states: &[StructuredState]) -> StructuredState {
        let mut combined: Vec<ExtractedFact> = Vec::new();

        for state in states {
            for fact in &state.facts {
                match combined.iter_mut().find(|existing| existing.key == fact.key) {
                    None => combined.push(fact.clone()),
                    Some(existing) => {
                        if existing.value != fact.value {
                            existing.value = format!("{}; {}", existing.value, fact.value);
                        }
                    }
                }
            }
        }

        StructuredState::new(combined)
    }
}

/// Strategy interface for extracting structured state from entries
#[async_trait]
pub trait StateExtractor: Send + Sync {
    /// Extract key-value facts from the entries.
    ///
    /// Returns an empty state for empty input.
    async fn extract_state(&self, entries: &[Entry]) -> Result<StructuredState>;
}

/// Boxed extraction function used by [`CustomStateExtractor`]
pub type ExtractFn =
    dyn Fn(Vec<Entry>) -> BoxFuture<'static, Result<StructuredState>> + Send + Sync;

/// A state extractor backed by a user-provided async function
#[derive(Clone)]
pub struct CustomStateExtractor {
    function: Arc<ExtractFn>,
}

impl CustomStateExtractor {
    /// Wrap an extraction function
    pub fn new(function: Arc<ExtractFn>) -> Self {
        Self { function }
    }
}

#[async_trait]
impl StateExtractor for CustomStateExtractor {
    async fn extract_state(&self, entries: &[Entry]) -> Result<StructuredState> {
        (self.function)(entries.to_vec()).await
    }
}

/// Configuration for the structured state reduction strategy
#[derive(Clone)]
pub struct StructuredStateConfiguration {
    /// Number of most recent conversation entries kept verbatim
    pub recent_turns_to_keep: usize,

    /// The extractor used to build state from older conversation
    pub state_extractor: Arc<dyn StateExtractor>,

    /// Optional extra instructions guiding extraction
    pub extraction_instructions: Option<String>,

    /// Locale, for locale-specific prompt behavior
    pub locale: Locale,

    /// Whether instruction entries are preserved at the head
    pub keep_instructions: bool,
}

impl StructuredStateConfiguration {
    /// Create a configuration with the given extractor and defaults for
    /// everything else.
    pub fn new(state_extractor: Arc<dyn StateExtractor>) -> Self {
        Self {
            recent_turns_to_keep: crate::summarize::config::DEFAULT_RECENT_TURNS_TO_KEEP,
            state_extractor,
            extraction_instructions: None,
            locale: Locale::default(),
            keep_instructions: true,
        }
    }

    /// Create a configuration backed by the default LLM extractor
    pub fn with_defaults(factory: Arc<dyn GeneratorFactory>) -> Self {
        Self::new(Arc::new(LlmStateExtractor::new(factory)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(key: &str, value: &str) -> ExtractedFact {
        ExtractedFact {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_merge_disjoint_keys_is_union() {
        let merged = StructuredState::merged(&[
            StructuredState::new(vec![fact("name", "Ada")]),
            StructuredState::new(vec![fact("date", "Friday")]),
        ]);

        assert_eq!(
            merged.facts,
            vec![fact("name", "Ada"), fact("date", "Friday")]
        );
    }

    #[test]
    fn test_merge_identical_values_is_idempotent() {
        let merged = StructuredState::merged(&[
            StructuredState::new(vec![fact("name", "Ada")]),
            StructuredState::new(vec![fact("name", "Ada")]),
        ]);

        assert_eq!(merged.facts, vec![fact("name", "Ada")]);
    }

    #[test]
    fn test_merge_conflicting_values_concatenates() {
        let merged = StructuredState::merged(&[
            StructuredState::new(vec![fact("decision_time", "7pm")]),
            StructuredState::new(vec![fact("decision_time", "8pm")]),
        ]);

        assert_eq!(merged.facts, vec![fact("decision_time", "7pm; 8pm")]);
    }

    #[test]
    fn test_merge_preserves_encounter_order() {
        let merged = StructuredState::merged(&[
            StructuredState::new(vec![fact("zebra", "z"), fact("apple", "a")]),
            StructuredState::new(vec![fact("middle", "m")]),
        ]);

        let keys: Vec<&str> = merged.facts.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["zebra", "apple", "middle"]);
    }

    #[tokio::test]
    async fn test_custom_extractor_delegates() {
        let extractor = CustomStateExtractor::new(Arc::new(|entries| {
            Box::pin(async move {
                Ok(StructuredState::new(vec![ExtractedFact {
                    key: "count".to_string(),
                    value: entries.len().to_string(),
                }]))
            })
        }));

        let state = extractor
            .extract_state(&[Entry::prompt("a"), Entry::response("b")])
            .await
            .unwrap();
        assert_eq!(state.facts[0].value, "2");
    }
}
