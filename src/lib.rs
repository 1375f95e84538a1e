//! Contextual - context-window management for LLM chat sessions
//!
//! Manages the finite context window of a conversational language-model
//! session: decides what to keep, summarize, or discard from a growing
//! transcript so that requests continue to fit within a token budget, and
//! recovers automatically when the budget is exceeded anyway.
//!
//! # Architecture
//!
//! - Transcript / Entry model - immutable ordered conversation log
//! - Reducer family - six strategies behind one `ContextReducer` trait
//! - Summarizer / TopicDetector / StateExtractor - resilient LLM helpers
//!   that survive oversized input by recursive split/merge
//! - `ContextualSession` - retry state machine around the reduction engine

pub mod errors;
pub mod transcript;
pub mod estimator;
pub mod chunker;
pub mod locale;
pub mod generator;
pub mod summarize;
pub mod topics;
pub mod state;
pub mod reducers;
pub mod policy;
pub mod engine;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use errors::{ContextError, Result};
pub use transcript::{Entry, Segment, Transcript};
pub use locale::Locale;
pub use generator::{Generator, GeneratorFactory, OllamaGenerator, OllamaGeneratorFactory};
pub use summarize::{
    CustomSummarizer, HierarchicalSummaryConfiguration, LlmSummarizer,
    RollingSummaryConfiguration, Summarizer, SummaryGranularity,
};
pub use topics::{LlmTopicDetector, TopicDetector};
pub use state::{
    CustomStateExtractor, ExtractedFact, LlmStateExtractor, StateExtractor, StructuredState,
    StructuredStateConfiguration,
};
pub use policy::ReductionPolicy;
pub use engine::ReductionEngine;
pub use logging::ReductionLogLevel;
pub use session::{ContextualSession, ReductionInfo, ReductionObserver};
