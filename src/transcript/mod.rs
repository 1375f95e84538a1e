//! Conversation transcript: an immutable ordered log of entries
//!
//! Insertion order is chronological and semantically meaningful. Reducers
//! never reorder entries: instructions stay first, conversation entries keep
//! their original relative order, and a transcript is always replaced
//! wholesale rather than mutated in place.

pub mod entry;

pub use entry::{Entry, Segment};

use crate::estimator;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Ordered log of conversation entries exchanged with a language model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// Create a transcript from an ordered list of entries
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in chronological order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Borrow the entries as a slice
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Consume the transcript, returning its entries
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Split the transcript into instruction entries and conversation
    /// entries, each preserving original order.
    ///
    /// Every reducer (and the session's safety valve) starts from this
    /// partition and reassembles `[instructions?] + [conversation']`.
    pub fn partition_instructions(&self) -> (Vec<Entry>, Vec<Entry>) {
        let mut instructions = Vec::new();
        let mut conversation = Vec::new();

        for entry in &self.entries {
            if entry.is_instructions() {
                instructions.push(entry.clone());
            } else {
                conversation.push(entry.clone());
            }
        }

        (instructions, conversation)
    }

    /// Total character count of all text content across entries
    pub fn character_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.text().map(|t| t.chars().count()).unwrap_or(0))
            .sum()
    }

    /// Estimated token count for the whole transcript.
    ///
    /// Uses the ~4 characters per token heuristic; see [`crate::estimator`].
    pub fn estimated_token_count(&self) -> usize {
        std::cmp::max(1, self.character_count() / 4)
    }

    /// Sum of per-entry token estimates (tool entries contribute zero)
    pub fn estimated_entry_tokens(&self) -> usize {
        self.entries.iter().map(estimator::estimate_entry).sum()
    }

    /// Render the transcript for display, one line per entry with a role
    /// tag and a text prefix of at most `prefix_len` characters.
    pub fn pretty_printed(&self, prefix_len: usize) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let text = entry.text().unwrap_or_else(|| "...".to_string());
                let prefix: String = text.chars().take(prefix_len).collect();
                format!("{}. {} {}...", index, entry.role_label(), prefix)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Index<usize> for Transcript {
    type Output = Entry;

    fn index(&self, index: usize) -> &Entry {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Vec<Entry>> for Transcript {
    fn from(entries: Vec<Entry>) -> Self {
        Transcript::new(entries)
    }
}
