//! LLM-driven topic detector
//!
//! Issues one generation call asking for JSON topic groups over an indexed
//! rendering of the entries, then enforces the partition invariant on
//! whatever comes back: out-of-bounds or already-claimed indices are
//! dropped, unclaimed entries are collected into a trailing group, and a
//! degenerate response falls back to a single all-entries group.

use crate::errors::Result;
use crate::generator::{self, GeneratorFactory};
use crate::topics::{TopicDetectionResponse, TopicDetector};
use crate::transcript::Entry;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Default topic detector implementation driving a [`GeneratorFactory`]
pub struct LlmTopicDetector {
    factory: Arc<dyn GeneratorFactory>,
}

impl LlmTopicDetector {
    /// Create a detector that runs its generation call through `factory`
    pub fn new(factory: Arc<dyn GeneratorFactory>) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl TopicDetector for LlmTopicDetector {
    async fn detect_topics(&self, entries: &[Entry]) -> Result<Vec<Vec<Entry>>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let conversation_text = render_indexed(entries);

        let prompt = format!(
            "Analyze the following conversation and identify distinct topics.\n\
             Group the entries by topic. For each topic, list the entry indices that belong to it.\n\n\
             Format your response as JSON with this structure:\n\
             {{\n  \"topics\": [\n    {{\n      \"topic\": \"Topic name\",\n      \"entry_indices\": [0, 1, 2]\n    }},\n    {{\n      \"topic\": \"Another topic\",\n      \"entry_indices\": [3, 4, 5]\n    }}\n  ]\n}}\n\n\
             Conversation:\n{}",
            conversation_text
        );

        let response = generator::generate_once(self.factory.as_ref(), &prompt).await?;
        let parsed = parse_topics(&response);

        Ok(group_entries(parsed, entries))
    }
}

/// Render entries as `[Entry i]: text` lines for the detection prompt
fn render_indexed(entries: &[Entry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry.text() {
            Some(text) => format!("[Entry {}]: {}", index, text),
            None => format!("[Entry {}]: (non-text entry)", index),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parse the model response, tolerating markdown fences and leading prose.
/// Returns no groups when nothing usable can be extracted.
fn parse_topics(response: &str) -> Vec<crate::topics::TopicGroup> {
    let start = match response.find('{') {
        Some(index) => index,
        None => return Vec::new(),
    };
    let end = match response.rfind('}') {
        Some(index) => index + 1,
        None => return Vec::new(),
    };
    if end <= start {
        return Vec::new();
    }

    match serde_json::from_str::<TopicDetectionResponse>(&response[start..end]) {
        Ok(parsed) => parsed.topics,
        Err(err) => {
            debug!(error = %err, "unusable topic detection response");
            Vec::new()
        }
    }
}

/// Enforce the partition invariant over the model-returned groups
fn group_entries(groups: Vec<crate::topics::TopicGroup>, entries: &[Entry]) -> Vec<Vec<Entry>> {
    let mut topic_groups: Vec<Vec<Entry>> = Vec::new();
    let mut used_indices: HashSet<usize> = HashSet::new();

    for group in groups {
        let group_entries: Vec<Entry> = group
            .entry_indices
            .iter()
            .filter_map(|&index| {
                if index >= entries.len() || used_indices.contains(&index) {
                    return None;
                }
                used_indices.insert(index);
                Some(entries[index].clone())
            })
            .collect();

        if !group_entries.is_empty() {
            topic_groups.push(group_entries);
        }
    }

    let unassigned: Vec<Entry> = entries
        .iter()
        .enumerate()
        .filter(|(index, _)| !used_indices.contains(index))
        .map(|(_, entry)| entry.clone())
        .collect();

    if !unassigned.is_empty() {
        topic_groups.push(unassigned);
    }

    if topic_groups.is_empty() {
        topic_groups.push(entries.to_vec());
    }

    topic_groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::TopicGroup;

    fn entries() -> Vec<Entry> {
        vec![
            Entry::prompt("p0"),
            Entry::response("r1"),
            Entry::prompt("p2"),
            Entry::response("r3"),
        ]
    }

    fn flatten(groups: &[Vec<Entry>]) -> Vec<Entry> {
        groups.iter().flatten().cloned().collect()
    }

    #[test]
    fn test_valid_groups_partition() {
        let groups = group_entries(
            vec![
                TopicGroup {
                    topic: "a".to_string(),
                    entry_indices: vec![0, 1],
                },
                TopicGroup {
                    topic: "b".to_string(),
                    entry_indices: vec![2, 3],
                },
            ],
            &entries(),
        );

        assert_eq!(groups.len(), 2);
        assert_eq!(flatten(&groups).len(), 4);
    }

    #[test]
    fn test_duplicate_and_out_of_bounds_indices_dropped() {
        let groups = group_entries(
            vec![
                TopicGroup {
                    topic: "a".to_string(),
                    entry_indices: vec![0, 1, 99],
                },
                TopicGroup {
                    topic: "b".to_string(),
                    entry_indices: vec![1, 2],
                },
            ],
            &entries(),
        );

        // Entry 1 stays with the first group; entry 3 lands in the
        // trailing unassigned group.
        assert_eq!(groups.len(), 3);
        let all = flatten(&groups);
        assert_eq!(all.len(), 4);
        for entry in entries() {
            assert_eq!(all.iter().filter(|e| **e == entry).count(), 1);
        }
    }

    #[test]
    fn test_empty_model_response_falls_back_to_single_group() {
        let groups = group_entries(Vec::new(), &entries());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0], entries());
    }

    #[test]
    fn test_parse_tolerates_fences() {
        let response = "Here you go:\n```json\n{\"topics\":[{\"topic\":\"x\",\"entry_indices\":[0]}]}\n```";
        let topics = parse_topics(response);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].entry_indices, vec![0]);
    }

    #[test]
    fn test_parse_garbage_yields_no_groups() {
        assert!(parse_topics("no json here").is_empty());
        assert!(parse_topics("{not valid json}").is_empty());
    }

    #[test]
    fn test_render_indexed_marks_non_text_entries() {
        let rendered = render_indexed(&[
            Entry::prompt("hello"),
            Entry::ToolOutput {
                tool: "shell".to_string(),
                output: "ls".to_string(),
            },
        ]);
        assert!(rendered.contains("[Entry 0]: hello"));
        assert!(rendered.contains("[Entry 1]: (non-text entry)"));
    }
}
