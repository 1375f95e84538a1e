//! Configuration for the summary-based reduction strategies

use crate::generator::GeneratorFactory;
use crate::locale::Locale;
use crate::summarize::llm::LlmSummarizer;
use crate::summarize::Summarizer;
use crate::topics::llm::LlmTopicDetector;
use crate::topics::TopicDetector;
use std::sync::Arc;

/// Default number of recent conversation entries kept verbatim
pub const DEFAULT_RECENT_TURNS_TO_KEEP: usize = 2;

/// Granularity level for hierarchical summarization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryGranularity {
    /// Each conversation turn is summarized individually
    PerTurn,

    /// Entries are grouped by topic and summarized per group
    PerTopic,

    /// All entries are summarized together
    Global,
}

impl SummaryGranularity {
    /// Human-readable label used in synthesized summary entries
    pub fn label(&self) -> &'static str {
        match self {
            SummaryGranularity::PerTurn => "Per-Turn",
            SummaryGranularity::PerTopic => "Per-Topic",
            SummaryGranularity::Global => "Global",
        }
    }
}

/// Configuration for the rolling summary reduction strategy
#[derive(Clone)]
pub struct RollingSummaryConfiguration {
    /// Number of most recent conversation entries kept verbatim
    pub recent_turns_to_keep: usize,

    /// The summarizer used for older entries
    pub summarizer: Arc<dyn Summarizer>,

    /// Optional custom instructions guiding the summarization
    pub summarization_instructions: Option<String>,

    /// Locale for the summary text
    pub locale: Locale,

    /// Whether instruction entries are preserved at the head
    pub keep_instructions: bool,
}

impl RollingSummaryConfiguration {
    /// Create a configuration with the given summarizer and defaults for
    /// everything else.
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            recent_turns_to_keep: DEFAULT_RECENT_TURNS_TO_KEEP,
            summarizer,
            summarization_instructions: None,
            locale: Locale::default(),
            keep_instructions: true,
        }
    }

    /// Create a configuration backed by the default LLM summarizer
    pub fn with_defaults(factory: Arc<dyn GeneratorFactory>) -> Self {
        Self::new(Arc::new(LlmSummarizer::new(factory)))
    }
}

/// Configuration for the hierarchical summary reduction strategy
#[derive(Clone)]
pub struct HierarchicalSummaryConfiguration {
    /// Number of most recent conversation entries kept verbatim
    pub recent_turns_to_keep: usize,

    /// The summarizer used for older entries
    pub summarizer: Arc<dyn Summarizer>,

    /// Optional custom instructions guiding the summarization
    pub summarization_instructions: Option<String>,

    /// Locale for the summary text
    pub locale: Locale,

    /// Whether instruction entries are preserved at the head
    pub keep_instructions: bool,

    /// Ordered granularity levels; one summary entry is produced per level
    pub granularity_levels: Vec<SummaryGranularity>,

    /// Topic detector used when `PerTopic` is among the levels
    pub topic_detector: Arc<dyn TopicDetector>,
}

impl HierarchicalSummaryConfiguration {
    /// Create a configuration with the given summarizer and topic detector,
    /// defaulting to a single global summary level.
    pub fn new(summarizer: Arc<dyn Summarizer>, topic_detector: Arc<dyn TopicDetector>) -> Self {
        Self {
            recent_turns_to_keep: DEFAULT_RECENT_TURNS_TO_KEEP,
            summarizer,
            summarization_instructions: None,
            locale: Locale::default(),
            keep_instructions: true,
            granularity_levels: vec![SummaryGranularity::Global],
            topic_detector,
        }
    }

    /// Create a configuration backed by the default LLM implementations
    pub fn with_defaults(factory: Arc<dyn GeneratorFactory>) -> Self {
        Self::new(
            Arc::new(LlmSummarizer::new(factory.clone())),
            Arc::new(LlmTopicDetector::new(factory)),
        )
    }
}
