//! Reduction engine
//!
//! Maps a [`ReductionPolicy`] to its concrete reducer and runs it. Policies
//! configured with `None` get default LLM-backed configurations built from
//! the engine's generator factory.

use crate::errors::Result;
use crate::generator::GeneratorFactory;
use crate::policy::ReductionPolicy;
use crate::reducers::{
    ContextReducer, HeadTailWindowReducer, HierarchicalSummaryReducer, NoOpReducer,
    RollingSummaryReducer, SlidingWindowReducer, StructuredStateReducer,
};
use crate::state::StructuredStateConfiguration;
use crate::summarize::{HierarchicalSummaryConfiguration, RollingSummaryConfiguration};
use crate::transcript::Transcript;
use std::sync::Arc;

/// Applies the configured reduction policy to transcripts
pub struct ReductionEngine {
    policy: ReductionPolicy,
    factory: Arc<dyn GeneratorFactory>,
}

impl ReductionEngine {
    /// Create an engine for the given policy.
    ///
    /// The factory is used to build default summarizers, topic detectors,
    /// and state extractors for policies configured with `None`.
    pub fn new(policy: ReductionPolicy, factory: Arc<dyn GeneratorFactory>) -> Self {
        Self { policy, factory }
    }

    /// Display name of the engine's policy
    pub fn policy_name(&self) -> String {
        self.policy.name()
    }

    /// Whether the policy has a real reduction behind it
    pub fn is_policy_implemented(&self) -> bool {
        self.policy.is_implemented()
    }

    /// Reduce the transcript according to the policy.
    ///
    /// Unimplemented policies pass the transcript through unchanged.
    pub async fn reduce(&self, transcript: &Transcript) -> Result<Transcript> {
        self.reducer().reduce(transcript).await
    }

    fn reducer(&self) -> Box<dyn ContextReducer> {
        match &self.policy {
            ReductionPolicy::SlidingWindow { turns } => {
                Box::new(SlidingWindowReducer::new(*turns, true))
            }
            ReductionPolicy::HeadTailWindow => Box::new(HeadTailWindowReducer::default()),
            ReductionPolicy::RollingSummary(config) => {
                let config = config.clone().unwrap_or_else(|| {
                    RollingSummaryConfiguration::with_defaults(self.factory.clone())
                });
                Box::new(RollingSummaryReducer::new(config))
            }
            ReductionPolicy::HierarchicalSummary(config) => {
                let config = config.clone().unwrap_or_else(|| {
                    HierarchicalSummaryConfiguration::with_defaults(self.factory.clone())
                });
                Box::new(HierarchicalSummaryReducer::new(config))
            }
            ReductionPolicy::StructuredState(config) => {
                let config = config.clone().unwrap_or_else(|| {
                    StructuredStateConfiguration::with_defaults(self.factory.clone())
                });
                Box::new(StructuredStateReducer::new(config))
            }
            ReductionPolicy::SaliencePruning
            | ReductionPolicy::SemanticRecall
            | ReductionPolicy::TopicMemory
            | ReductionPolicy::QueryRewriting
            | ReductionPolicy::DynamicInjection
            | ReductionPolicy::DhRag
            | ReductionPolicy::ReflectiveMemory => Box::new(NoOpReducer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::summarize::{CustomSummarizer, Summarizer};
    use crate::transcript::Entry;
    use async_trait::async_trait;

    struct InertGenerator {
        transcript: Transcript,
    }

    #[async_trait]
    impl Generator for InertGenerator {
        async fn respond(&mut self, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }

        fn transcript(&self) -> &Transcript {
            &self.transcript
        }
    }

    struct InertFactory;

    impl GeneratorFactory for InertFactory {
        fn make(&self, transcript: Transcript) -> Box<dyn Generator> {
            Box::new(InertGenerator { transcript })
        }
    }

    fn transcript() -> Transcript {
        Transcript::new(vec![
            Entry::instructions("sys"),
            Entry::prompt("t1"),
            Entry::response("r1"),
            Entry::prompt("t2"),
            Entry::response("r2"),
        ])
    }

    #[tokio::test]
    async fn test_sliding_window_dispatch() {
        let engine = ReductionEngine::new(
            ReductionPolicy::SlidingWindow { turns: 2 },
            Arc::new(InertFactory),
        );
        let reduced = engine.reduce(&transcript()).await.unwrap();
        assert_eq!(reduced.len(), 3);
        assert_eq!(engine.policy_name(), "SlidingWindow(2)");
    }

    #[tokio::test]
    async fn test_rolling_summary_with_explicit_config() {
        let summarizer: Arc<dyn Summarizer> = Arc::new(CustomSummarizer::new(Arc::new(
            |_, _, _| Box::pin(async move { Ok("condensed".to_string()) }),
        )));
        let mut config = RollingSummaryConfiguration::new(summarizer);
        config.recent_turns_to_keep = 0;

        let engine = ReductionEngine::new(
            ReductionPolicy::RollingSummary(Some(config)),
            Arc::new(InertFactory),
        );
        let reduced = engine.reduce(&transcript()).await.unwrap();
        assert!(reduced[1].text().unwrap().contains("condensed"));
    }

    #[tokio::test]
    async fn test_unimplemented_policy_is_pass_through() {
        let engine = ReductionEngine::new(ReductionPolicy::SemanticRecall, Arc::new(InertFactory));
        assert!(!engine.is_policy_implemented());

        let reduced = engine.reduce(&transcript()).await.unwrap();
        assert_eq!(reduced, transcript());
    }
}
