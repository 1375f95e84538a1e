//! Reduction logging
//!
//! Emits a structured log line summarizing what a reduction removed, in
//! entries, characters, and estimated tokens.

use crate::transcript::Transcript;
use tracing::info;

/// How much reduction activity is logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReductionLogLevel {
    /// No reduction logging
    #[default]
    Off,

    /// One line per reduction
    Minimal,

    /// One line per reduction, plus whatever the reducers themselves emit
    Verbose,
}

/// Log the outcome of one reduction pass
pub fn log_reduction(
    level: ReductionLogLevel,
    original: &Transcript,
    reduced: &Transcript,
    reducer_name: &str,
) {
    if level == ReductionLogLevel::Off {
        return;
    }

    let entries_before = original.len();
    let entries_after = reduced.len();
    let chars_before = original.character_count();
    let chars_after = reduced.character_count();
    let tokens_before = original.estimated_token_count();
    let tokens_after = reduced.estimated_token_count();

    info!(
        reducer = reducer_name,
        entries_before,
        entries_after,
        entries_removed = entries_before.saturating_sub(entries_after),
        chars_before,
        chars_after,
        chars_saved = chars_before.saturating_sub(chars_after),
        tokens_before,
        tokens_after,
        tokens_saved = tokens_before.saturating_sub(tokens_after),
        "context reduced"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Entry;

    #[test]
    fn test_off_level_is_silent() {
        // Must not panic even on an empty pair
        log_reduction(
            ReductionLogLevel::Off,
            &Transcript::default(),
            &Transcript::default(),
            "SlidingWindow(1)",
        );
    }

    #[test]
    fn test_logging_handles_growth() {
        // A reduction can synthesize a longer transcript; the saved counts
        // saturate at zero instead of underflowing.
        let original = Transcript::new(vec![Entry::prompt("hi")]);
        let reduced = Transcript::new(vec![
            Entry::prompt("Summary of previous conversation: a very long summary"),
            Entry::prompt("hi"),
        ]);
        log_reduction(
            ReductionLogLevel::Minimal,
            &original,
            &reduced,
            "RollingSummary",
        );
        log_reduction(
            ReductionLogLevel::Verbose,
            &original,
            &reduced,
            "RollingSummary",
        );
    }

    #[test]
    fn test_default_level_is_off() {
        assert_eq!(ReductionLogLevel::default(), ReductionLogLevel::Off);
    }
}
