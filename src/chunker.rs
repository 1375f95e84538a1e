//! Conversation chunking with token limits and overlap
//!
//! Splits entry lists into token-bounded chunks with a trailing-entry
//! overlap between consecutive chunks, and exposes the context-window fit
//! predicates used for proactive overflow detection.

use crate::estimator;
use crate::transcript::Entry;

/// Maximum number of tokens that fit in the model's context window
pub const CONTEXT_WINDOW_LIMIT: usize = 4096;

/// Safe content token limit: `CONTEXT_WINDOW_LIMIT` minus a 500-token
/// margin for prompt overhead and the response.
pub const SAFE_CONTENT_TOKEN_LIMIT: usize = 3600;

/// Default maximum tokens per chunk
pub const DEFAULT_MAX_TOKENS_PER_CHUNK: usize = 1000;

/// Default overlap tokens between chunks (20% of the chunk budget)
pub const DEFAULT_OVERLAP_TOKENS: usize = 200;

/// Chunk entries into groups that fit within the token limit, seeding each
/// new chunk with an overlap suffix of the previous one.
///
/// The overlap walks backward from the end of the just-closed chunk,
/// accumulating whole entries while their cumulative tokens stay within
/// `overlap_tokens`, and stops at the first entry that would break the
/// budget. A single entry larger than the chunk budget still forms its own
/// chunk.
pub fn chunk_entries(
    entries: &[Entry],
    max_tokens_per_chunk: usize,
    overlap_tokens: usize,
) -> Vec<Vec<Entry>> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut chunks: Vec<Vec<Entry>> = Vec::new();
    let mut current_chunk: Vec<Entry> = Vec::new();
    let mut current_tokens = 0usize;

    for entry in entries {
        let entry_tokens = estimator::estimate_entry(entry);

        if current_tokens + entry_tokens > max_tokens_per_chunk && !current_chunk.is_empty() {
            // Build the overlap suffix before closing the chunk
            let mut overlap_entries: Vec<Entry> = Vec::new();
            let mut overlap_token_count = 0usize;

            for previous in current_chunk.iter().rev() {
                let previous_tokens = estimator::estimate_entry(previous);
                if overlap_token_count + previous_tokens <= overlap_tokens {
                    overlap_entries.insert(0, previous.clone());
                    overlap_token_count += previous_tokens;
                } else {
                    break;
                }
            }

            chunks.push(std::mem::take(&mut current_chunk));
            current_chunk = overlap_entries;
            current_tokens = overlap_token_count;
        }

        current_chunk.push(entry.clone());
        current_tokens += entry_tokens;
    }

    if !current_chunk.is_empty() {
        chunks.push(current_chunk);
    }

    if chunks.is_empty() {
        chunks.push(entries.to_vec());
    }

    chunks
}

/// Chunk entries with the default token budget and overlap
pub fn chunk_entries_default(entries: &[Entry]) -> Vec<Vec<Entry>> {
    chunk_entries(entries, DEFAULT_MAX_TOKENS_PER_CHUNK, DEFAULT_OVERLAP_TOKENS)
}

/// Whether the entries fit within the context window
pub fn fits_in_context_window(entries: &[Entry]) -> bool {
    estimator::estimate_entries(entries) <= CONTEXT_WINDOW_LIMIT
}

/// Whether the entries plus one candidate entry fit within the context window
pub fn fits_in_context_window_with(entries: &[Entry], candidate: &Entry) -> bool {
    let current = estimator::estimate_entries(entries);
    let candidate_tokens = estimator::estimate_entry(candidate);
    current + candidate_tokens <= CONTEXT_WINDOW_LIMIT
}
