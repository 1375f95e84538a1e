//! Token estimation with a character-count heuristic
//!
//! Base estimate: 1 token ~ 4 characters. This is an approximation, not a
//! tokenizer: it is biased toward English and other Latin-script languages
//! and under-counts token-dense scripts (Japanese, Chinese, Korean run
//! closer to one token per character).

use crate::transcript::Entry;

/// Estimate the number of tokens in a text string.
///
/// `max(1, chars / 4)` - any non-empty estimate request costs at least
/// one token.
pub fn estimate_text(text: &str) -> usize {
    std::cmp::max(1, text.chars().count() / 4)
}

/// Estimate the number of tokens in a transcript entry.
///
/// Tool calls and tool outputs carry no addressable text and contribute
/// zero tokens.
pub fn estimate_entry(entry: &Entry) -> usize {
    match entry.text() {
        Some(text) => estimate_text(&text),
        None => 0,
    }
}

/// Estimate total tokens across a slice of entries
pub fn estimate_entries(entries: &[Entry]) -> usize {
    entries.iter().map(estimate_entry).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_estimation() {
        assert_eq!(estimate_text(&"a".repeat(100)), 25);
    }

    #[test]
    fn test_floor_of_one() {
        assert_eq!(estimate_text(""), 1);
        assert_eq!(estimate_text("ab"), 1);
    }

    #[test]
    fn test_unicode_counts_chars_not_bytes() {
        // 8 chars, 24 bytes
        assert_eq!(estimate_text("日本語日本語日本"), 2);
    }

    #[test]
    fn test_entry_estimation() {
        assert_eq!(estimate_entry(&Entry::prompt("a".repeat(40))), 10);
    }

    #[test]
    fn test_tool_entries_are_free() {
        let entry = Entry::ToolOutput {
            tool: "shell".to_string(),
            output: "x".repeat(10_000),
        };
        assert_eq!(estimate_entry(&entry), 0);
    }

    #[test]
    fn test_entries_sum() {
        let entries = vec![
            Entry::prompt("a".repeat(40)),
            Entry::response("b".repeat(40)),
        ];
        assert_eq!(estimate_entries(&entries), 20);
    }
}
