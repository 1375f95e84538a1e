//! Contextual session
//!
//! Wraps a generator and transparently recovers from context window
//! overflows: the configured policy is applied first, then progressively
//! smaller sliding windows, and finally the transcript is cut down to the
//! single most recent conversation entry.

use crate::engine::ReductionEngine;
use crate::errors::Result;
use crate::generator::{Generator, GeneratorFactory};
use crate::logging::{log_reduction, ReductionLogLevel};
use crate::policy::ReductionPolicy;
use crate::reducers::tail;
use crate::transcript::Transcript;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};

/// Maximum number of reduction attempts before the last-resort cut
const MAX_REDUCTION_ATTEMPTS: usize = 5;

/// Receives a callback after every context reduction
pub trait ReductionObserver: Send + Sync {
    /// Called with the transcript before and after reduction and the name
    /// of the reducer that produced it.
    fn on_reduced(&self, original: &Transcript, reduced: &Transcript, reducer_name: &str);
}

/// Record of the most recent context reduction
#[derive(Clone)]
pub struct ReductionInfo {
    /// Transcript before the reduction
    pub original: Transcript,

    /// Transcript the session continued with
    pub reduced: Transcript,

    /// Name of the reducer that was applied
    pub reducer_name: String,

    /// When the reduction happened
    pub occurred_at: DateTime<Utc>,
}

/// A chat session that reduces its own context when the model reports an
/// overflow.
pub struct ContextualSession {
    generator: Box<dyn Generator>,
    factory: Arc<dyn GeneratorFactory>,
    engine: ReductionEngine,
    log_level: ReductionLogLevel,
    observer: Option<Weak<dyn ReductionObserver>>,
    last_reduction_info: Option<ReductionInfo>,
}

impl ContextualSession {
    /// Create a session with the default policy (`SlidingWindow(10)`) and
    /// logging off.
    pub fn new(factory: Arc<dyn GeneratorFactory>) -> Self {
        Self::with_policy(factory, ReductionPolicy::SlidingWindow { turns: 10 })
    }

    /// Create a session with an explicit reduction policy
    pub fn with_policy(factory: Arc<dyn GeneratorFactory>, policy: ReductionPolicy) -> Self {
        Self::with_transcript(factory, Transcript::default(), policy)
    }

    /// Resume a session from an existing transcript
    pub fn with_transcript(
        factory: Arc<dyn GeneratorFactory>,
        transcript: Transcript,
        policy: ReductionPolicy,
    ) -> Self {
        let generator = factory.make(transcript);
        let engine = ReductionEngine::new(policy, factory.clone());
        Self {
            generator,
            factory,
            engine,
            log_level: ReductionLogLevel::Off,
            observer: None,
            last_reduction_info: None,
        }
    }

    /// Set how much reduction activity is logged
    pub fn set_log_level(&mut self, level: ReductionLogLevel) {
        self.log_level = level;
    }

    /// Register an observer notified after every reduction.
    ///
    /// The observer is held weakly; a dropped observer is silently skipped.
    pub fn set_observer(&mut self, observer: &Arc<dyn ReductionObserver>) {
        self.observer = Some(Arc::downgrade(observer));
    }

    /// The transcript the session currently holds
    pub fn transcript(&self) -> &Transcript {
        self.generator.transcript()
    }

    /// Record of the most recent reduction, if any happened
    pub fn last_reduction_info(&self) -> Option<&ReductionInfo> {
        self.last_reduction_info.as_ref()
    }

    /// Send a prompt, reducing the context and retrying on overflow.
    ///
    /// Attempt 1 applies the configured policy; attempts 2 through 5 apply
    /// sliding windows of 4, 3, 2 and finally 1 conversation entries. When
    /// a reduction fails to shrink the transcript, the session instead
    /// keeps only the most recent conversation entries and drops the
    /// instructions. If all attempts still overflow, one last call is made
    /// with a single conversation entry and its outcome is returned as-is.
    /// Errors other than a context overflow propagate immediately.
    pub async fn respond(&mut self, prompt: &str) -> Result<String> {
        let mut attempts = 0;

        while attempts < MAX_REDUCTION_ATTEMPTS {
            match self.generator.respond(prompt).await {
                Ok(response) => return Ok(response),
                Err(error) if error.is_context_overflow() => {
                    attempts += 1;
                    self.reduce_after_overflow(attempts).await?;
                }
                Err(error) => return Err(error),
            }
        }

        // Last resort: a single conversation entry, no instructions
        let (_, conversation) = self.generator.transcript().partition_instructions();
        let minimal = Transcript::new(tail(&conversation, 1));
        self.generator = self.factory.make(minimal);
        self.generator.respond(prompt).await
    }

    async fn reduce_after_overflow(&mut self, attempts: usize) -> Result<()> {
        let original = self.generator.transcript().clone();

        let reduced = if attempts == 1 {
            self.engine.reduce(&original).await?
        } else {
            let turns = std::cmp::max(1, 6usize.saturating_sub(attempts));
            let fallback = ReductionEngine::new(
                ReductionPolicy::SlidingWindow { turns },
                self.factory.clone(),
            );
            fallback.reduce(&original).await?
        };

        // When reduction made no progress, cut straight to the most recent
        // conversation entries and drop the instructions.
        if reduced.len() >= original.len()
            && !original.is_empty()
            && attempts < MAX_REDUCTION_ATTEMPTS
        {
            let (_, conversation) = original.partition_instructions();
            let keep = std::cmp::max(1, MAX_REDUCTION_ATTEMPTS.saturating_sub(attempts));
            self.generator = self.factory.make(Transcript::new(tail(&conversation, keep)));
        } else {
            self.generator = self.factory.make(reduced);
        }

        let reducer_name = if attempts == 1 {
            self.engine.policy_name()
        } else {
            format!("AggressiveReduction(attempt {})", attempts)
        };

        let continued = self.generator.transcript().clone();

        self.last_reduction_info = Some(ReductionInfo {
            original: original.clone(),
            reduced: continued.clone(),
            reducer_name: reducer_name.clone(),
            occurred_at: Utc::now(),
        });

        if let Some(observer) = self.observer.as_ref().and_then(Weak::upgrade) {
            observer.on_reduced(&original, &continued, &reducer_name);
        }

        log_reduction(self.log_level, &original, &continued, &reducer_name);

        Ok(())
    }
}
