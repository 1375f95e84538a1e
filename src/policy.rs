//! Reduction policy selection
//!
//! A policy names the strategy used to shrink a transcript. Policies that
//! carry a configuration compare and hash by strategy only, so two
//! differently configured rolling summaries are considered the same policy.

use crate::state::StructuredStateConfiguration;
use crate::summarize::{HierarchicalSummaryConfiguration, RollingSummaryConfiguration};
use std::hash::{Hash, Hasher};

/// The context reduction strategy to apply when a transcript overflows
#[derive(Clone)]
pub enum ReductionPolicy {
    /// Keep only the most recent `turns` conversation entries
    SlidingWindow { turns: usize },

    /// Keep all instructions plus a fixed tail of recent entries
    HeadTailWindow,

    /// Replace older history with a running summary. `None` uses the
    /// default LLM-backed configuration.
    RollingSummary(Option<RollingSummaryConfiguration>),

    /// Summaries at multiple granularities (global, per-turn, per-topic)
    HierarchicalSummary(Option<HierarchicalSummaryConfiguration>),

    /// Replace older history with extracted key-value facts
    StructuredState(Option<StructuredStateConfiguration>),

    /// Not yet implemented; reduces to a pass-through
    SaliencePruning,

    /// Not yet implemented; reduces to a pass-through
    SemanticRecall,

    /// Not yet implemented; reduces to a pass-through
    TopicMemory,

    /// Not yet implemented; reduces to a pass-through
    QueryRewriting,

    /// Not yet implemented; reduces to a pass-through
    DynamicInjection,

    /// Not yet implemented; reduces to a pass-through
    DhRag,

    /// Not yet implemented; reduces to a pass-through
    ReflectiveMemory,
}

impl ReductionPolicy {
    /// Display name of the policy, including parameters where they affect
    /// behavior identity.
    pub fn name(&self) -> String {
        match self {
            ReductionPolicy::SlidingWindow { turns } => format!("SlidingWindow({})", turns),
            ReductionPolicy::HeadTailWindow => "HeadTailWindow".to_string(),
            ReductionPolicy::RollingSummary(_) => "RollingSummary".to_string(),
            ReductionPolicy::HierarchicalSummary(_) => "HierarchicalSummary".to_string(),
            ReductionPolicy::StructuredState(_) => "StructuredState".to_string(),
            ReductionPolicy::SaliencePruning => "SaliencePruning".to_string(),
            ReductionPolicy::SemanticRecall => "SemanticRecall".to_string(),
            ReductionPolicy::TopicMemory => "TopicMemory".to_string(),
            ReductionPolicy::QueryRewriting => "QueryRewriting".to_string(),
            ReductionPolicy::DynamicInjection => "DynamicInjection".to_string(),
            ReductionPolicy::DhRag => "dhRAG".to_string(),
            ReductionPolicy::ReflectiveMemory => "ReflectiveMemory".to_string(),
        }
    }

    /// Whether this policy has a real reduction behind it
    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            ReductionPolicy::SlidingWindow { .. }
                | ReductionPolicy::HeadTailWindow
                | ReductionPolicy::RollingSummary(_)
                | ReductionPolicy::HierarchicalSummary(_)
                | ReductionPolicy::StructuredState(_)
        )
    }

    /// Discriminant tag used for equality and hashing, ignoring attached
    /// configurations.
    fn discriminant(&self) -> &'static str {
        match self {
            ReductionPolicy::SlidingWindow { .. } => "sliding_window",
            ReductionPolicy::HeadTailWindow => "head_tail_window",
            ReductionPolicy::RollingSummary(_) => "rolling_summary",
            ReductionPolicy::HierarchicalSummary(_) => "hierarchical_summary",
            ReductionPolicy::StructuredState(_) => "structured_state",
            ReductionPolicy::SaliencePruning => "salience_pruning",
            ReductionPolicy::SemanticRecall => "semantic_recall",
            ReductionPolicy::TopicMemory => "topic_memory",
            ReductionPolicy::QueryRewriting => "query_rewriting",
            ReductionPolicy::DynamicInjection => "dynamic_injection",
            ReductionPolicy::DhRag => "dh_rag",
            ReductionPolicy::ReflectiveMemory => "reflective_memory",
        }
    }
}

impl PartialEq for ReductionPolicy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ReductionPolicy::SlidingWindow { turns: a },
                ReductionPolicy::SlidingWindow { turns: b },
            ) => a == b,
            _ => self.discriminant() == other.discriminant(),
        }
    }
}

impl Eq for ReductionPolicy {}

impl Hash for ReductionPolicy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.discriminant().hash(state);
        if let ReductionPolicy::SlidingWindow { turns } = self {
            turns.hash(state);
        }
    }
}

impl std::fmt::Debug for ReductionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::{CustomSummarizer, Summarizer};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn dummy_config() -> RollingSummaryConfiguration {
        let summarizer: Arc<dyn Summarizer> = Arc::new(CustomSummarizer::new(Arc::new(
            |_, _, _| Box::pin(async move { Ok(String::new()) }),
        )));
        RollingSummaryConfiguration::new(summarizer)
    }

    #[test]
    fn test_sliding_window_compares_by_turns() {
        assert_eq!(
            ReductionPolicy::SlidingWindow { turns: 5 },
            ReductionPolicy::SlidingWindow { turns: 5 }
        );
        assert_ne!(
            ReductionPolicy::SlidingWindow { turns: 5 },
            ReductionPolicy::SlidingWindow { turns: 3 }
        );
    }

    #[test]
    fn test_configured_policies_ignore_configuration() {
        assert_eq!(
            ReductionPolicy::RollingSummary(None),
            ReductionPolicy::RollingSummary(Some(dummy_config()))
        );
    }

    #[test]
    fn test_distinct_strategies_differ() {
        assert_ne!(
            ReductionPolicy::RollingSummary(None),
            ReductionPolicy::HeadTailWindow
        );
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let mut set = HashSet::new();
        set.insert(ReductionPolicy::RollingSummary(None));
        assert!(set.contains(&ReductionPolicy::RollingSummary(Some(dummy_config()))));

        set.insert(ReductionPolicy::SlidingWindow { turns: 5 });
        assert!(!set.contains(&ReductionPolicy::SlidingWindow { turns: 4 }));
    }

    #[test]
    fn test_names() {
        assert_eq!(
            ReductionPolicy::SlidingWindow { turns: 10 }.name(),
            "SlidingWindow(10)"
        );
        assert_eq!(ReductionPolicy::DhRag.name(), "dhRAG");
        assert_eq!(ReductionPolicy::StructuredState(None).name(), "StructuredState");
    }

    #[test]
    fn test_implemented_flags() {
        assert!(ReductionPolicy::SlidingWindow { turns: 1 }.is_implemented());
        assert!(ReductionPolicy::HierarchicalSummary(None).is_implemented());
        assert!(!ReductionPolicy::SaliencePruning.is_implemented());
        assert!(!ReductionPolicy::ReflectiveMemory.is_implemented());
    }
}
