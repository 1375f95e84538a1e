//! Context reduction strategies
//!
//! Five concrete strategies plus a no-op, all behind [`ContextReducer`].
//! Every reducer partitions the transcript into instruction entries and
//! conversation entries and reassembles `[kept instructions?] + [new/old
//! conversation entries]`; entry order is never changed, only filtered or
//! replaced-and-appended.

pub mod head_tail;
pub mod hierarchical;
pub mod noop;
pub mod rolling_summary;
pub mod sliding_window;
pub mod structured_state;

pub use head_tail::HeadTailWindowReducer;
pub use hierarchical::HierarchicalSummaryReducer;
pub use noop::NoOpReducer;
pub use rolling_summary::RollingSummaryReducer;
pub use sliding_window::SlidingWindowReducer;
pub use structured_state::StructuredStateReducer;

use crate::errors::Result;
use crate::transcript::Transcript;
use async_trait::async_trait;

/// The concrete algorithm implementing one reduction policy
#[async_trait]
pub trait ContextReducer: Send + Sync {
    /// Produce a reduced transcript; the input is never mutated
    async fn reduce(&self, transcript: &Transcript) -> Result<Transcript>;
}

/// Keep the last `count` entries of a conversation slice
pub(crate) fn tail(
    conversation: &[crate::transcript::Entry],
    count: usize,
) -> Vec<crate::transcript::Entry> {
    let start = conversation.len().saturating_sub(count);
    conversation[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Entry;

    #[test]
    fn test_tail_shorter_than_count() {
        let conversation = vec![Entry::prompt("a"), Entry::prompt("b")];
        assert_eq!(tail(&conversation, 5), conversation);
    }

    #[test]
    fn test_tail_takes_suffix() {
        let conversation = vec![
            Entry::prompt("a"),
            Entry::prompt("b"),
            Entry::prompt("c"),
        ];
        let kept = tail(&conversation, 2);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].text().unwrap(), "b");
    }

    #[test]
    fn test_tail_zero_keeps_nothing() {
        assert!(tail(&[Entry::prompt("a")], 0).is_empty());
    }
}
