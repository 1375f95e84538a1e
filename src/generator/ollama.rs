//! Ollama-backed generator over the `/api/chat` endpoint
//!
//! Default concrete [`Generator`]. The transcript is rendered to role-tagged
//! chat messages; before each call the estimated token total is checked
//! against the context window so an oversized transcript surfaces as
//! `ContextWindowExceeded` instead of a truncated model response.

use crate::chunker;
use crate::errors::{ContextError, Result};
use crate::estimator;
use crate::generator::{Generator, GeneratorFactory};
use crate::transcript::{Entry, Transcript};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_MODEL: &str = "llama3.1:8b";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Generator implementation backed by an Ollama-compatible chat API
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
    transcript: Transcript,
}

impl OllamaGenerator {
    /// Create a generator bound to the given transcript
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        transcript: Transcript,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            transcript,
        }
    }

    fn render_messages(&self, prompt: &str) -> Vec<ChatMessage> {
        let mut messages: Vec<ChatMessage> = self
            .transcript
            .iter()
            .filter_map(|entry| {
                let role = match entry {
                    Entry::Instructions { .. } => "system",
                    Entry::Prompt { .. } => "user",
                    Entry::Response { .. } => "assistant",
                    Entry::ToolOutput { .. } => "tool",
                    Entry::ToolCall { .. } => return None,
                };
                let content = match entry {
                    Entry::ToolOutput { output, .. } => output.clone(),
                    other => other.text().unwrap_or_default(),
                };
                Some(ChatMessage {
                    role: role.to_string(),
                    content,
                })
            })
            .collect();

        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        messages
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn respond(&mut self, prompt: &str) -> Result<String> {
        let candidate = Entry::prompt(prompt);
        if !chunker::fits_in_context_window_with(self.transcript.entries(), &candidate) {
            let current = estimator::estimate_entries(self.transcript.entries())
                + estimator::estimate_entry(&candidate);
            return Err(ContextError::ContextWindowExceeded {
                current,
                max: chunker::CONTEXT_WINDOW_LIMIT,
            });
        }

        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: self.render_messages(prompt),
            stream: false,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ContextError::Generation(format!(
                "Ollama API error {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat.message.content;

        let mut entries = self.transcript.entries().to_vec();
        entries.push(candidate);
        entries.push(Entry::response(content.clone()));
        self.transcript = Transcript::new(entries);

        Ok(content)
    }

    fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

/// Factory producing [`OllamaGenerator`] instances that share one HTTP client
#[derive(Clone)]
pub struct OllamaGeneratorFactory {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaGeneratorFactory {
    /// Create a factory for the given endpoint and model
    pub fn new(base_url: Option<String>, model: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

impl GeneratorFactory for OllamaGeneratorFactory {
    fn make(&self, transcript: Transcript) -> Box<dyn Generator> {
        Box::new(OllamaGenerator::new(
            self.client.clone(),
            self.base_url.clone(),
            self.model.clone(),
            transcript,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_oversized_transcript_fails_before_any_http() {
        // Unroutable endpoint: the overflow check must trip first
        let factory =
            OllamaGeneratorFactory::new(Some("http://127.0.0.1:1".to_string()), None).unwrap();

        let transcript = Transcript::new(vec![Entry::prompt("a".repeat(20_000))]);
        let mut generator = factory.make(transcript);

        let err = generator.respond("hello").await.unwrap_err();
        assert!(err.is_context_overflow());
    }

    #[test]
    fn test_message_rendering_roles() {
        let transcript = Transcript::new(vec![
            Entry::instructions("sys"),
            Entry::prompt("q"),
            Entry::response("a"),
            Entry::ToolCall {
                tool: "search".to_string(),
                arguments: serde_json::json!({}),
            },
            Entry::ToolOutput {
                tool: "search".to_string(),
                output: "result".to_string(),
            },
        ]);
        let generator =
            OllamaGenerator::new(Client::new(), DEFAULT_BASE_URL, DEFAULT_MODEL, transcript);

        let messages = generator.render_messages("next");
        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "tool", "user"]);
        assert_eq!(messages.last().unwrap().content, "next");
    }
}
