//! Entry types stored in a conversation transcript
//!
//! Defines the tagged entry variants exchanged with a language model.
//! Entries are immutable once created; reducers filter or replace them
//! but never rewrite an existing entry in place.

use serde::{Deserialize, Serialize};

/// One segment of an instructions, prompt, or response entry.
///
/// Only text segments carry addressable content; structured segments are
/// opaque to context management and contribute zero estimated tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segment_type", rename_all = "snake_case")]
pub enum Segment {
    /// Plain text content
    Text { content: String },

    /// Opaque structured payload (e.g. generated object, attachment)
    Structured { value: serde_json::Value },
}

/// One unit of a conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry_type", rename_all = "snake_case")]
pub enum Entry {
    /// System-level behavioral directives (always kept first)
    Instructions { segments: Vec<Segment> },

    /// User turn
    Prompt { segments: Vec<Segment> },

    /// Model turn
    Response { segments: Vec<Segment> },

    /// Model-requested tool invocation (opaque to reduction)
    ToolCall {
        tool: String,
        arguments: serde_json::Value,
    },

    /// Output of a tool invocation (opaque to reduction)
    ToolOutput { tool: String, output: String },
}

impl Entry {
    /// Create an instructions entry from plain text
    pub fn instructions(content: impl Into<String>) -> Self {
        Entry::Instructions {
            segments: vec![Segment::Text {
                content: content.into(),
            }],
        }
    }

    /// Create a prompt entry from plain text
    pub fn prompt(content: impl Into<String>) -> Self {
        Entry::Prompt {
            segments: vec![Segment::Text {
                content: content.into(),
            }],
        }
    }

    /// Create a response entry from plain text
    pub fn response(content: impl Into<String>) -> Self {
        Entry::Response {
            segments: vec![Segment::Text {
                content: content.into(),
            }],
        }
    }

    /// Extract the text content of this entry.
    ///
    /// Concatenates all text segments of instructions, prompts, and
    /// responses. Returns `None` for tool calls and tool outputs, which
    /// context management treats as opaque.
    pub fn text(&self) -> Option<String> {
        let segments = match self {
            Entry::Instructions { segments }
            | Entry::Prompt { segments }
            | Entry::Response { segments } => segments,
            Entry::ToolCall { .. } | Entry::ToolOutput { .. } => return None,
        };

        Some(
            segments
                .iter()
                .filter_map(|segment| match segment {
                    Segment::Text { content } => Some(content.as_str()),
                    Segment::Structured { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(""),
        )
    }

    /// Whether this entry is a system instructions entry
    pub fn is_instructions(&self) -> bool {
        matches!(self, Entry::Instructions { .. })
    }

    /// Role label used when rendering the transcript for display or logging
    pub fn role_label(&self) -> &'static str {
        match self {
            Entry::Instructions { .. } => "[SYSTEM]",
            Entry::Prompt { .. } => "[USER]",
            Entry::Response { .. } => "[ASSISTANT]",
            Entry::ToolCall { .. } | Entry::ToolOutput { .. } => "[OTHER]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_extraction_joins_segments() {
        let entry = Entry::Prompt {
            segments: vec![
                Segment::Text {
                    content: "Hello ".to_string(),
                },
                Segment::Structured {
                    value: serde_json::json!({"kind": "image"}),
                },
                Segment::Text {
                    content: "world".to_string(),
                },
            ],
        };

        assert_eq!(entry.text().unwrap(), "Hello world");
    }

    #[test]
    fn test_tool_entries_have_no_text() {
        let call = Entry::ToolCall {
            tool: "search".to_string(),
            arguments: serde_json::json!({"query": "rust"}),
        };
        let output = Entry::ToolOutput {
            tool: "search".to_string(),
            output: "ten results".to_string(),
        };

        assert!(call.text().is_none());
        assert!(output.text().is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let entry = Entry::instructions("Be concise");
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Entry::instructions("x").role_label(), "[SYSTEM]");
        assert_eq!(Entry::prompt("x").role_label(), "[USER]");
        assert_eq!(Entry::response("x").role_label(), "[ASSISTANT]");
    }
}
