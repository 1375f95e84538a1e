//! Pass-through reduction
//!
//! Returns the transcript unchanged. Used as the stand-in behavior for
//! reduction strategies that are declared but not yet implemented.

use crate::errors::Result;
use crate::reducers::ContextReducer;
use crate::transcript::Transcript;
use async_trait::async_trait;

/// Reducer that never removes anything
pub struct NoOpReducer;

#[async_trait]
impl ContextReducer for NoOpReducer {
    async fn reduce(&self, transcript: &Transcript) -> Result<Transcript> {
        Ok(transcript.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Entry;

    #[tokio::test]
    async fn test_returns_input_unchanged() {
        let transcript = Transcript::new(vec![
            Entry::instructions("sys"),
            Entry::prompt("hello"),
            Entry::response("hi"),
        ]);
        let reduced = NoOpReducer.reduce(&transcript).await.unwrap();
        assert_eq!(reduced, transcript);
    }

    #[tokio::test]
    async fn test_empty_transcript() {
        let reduced = NoOpReducer.reduce(&Transcript::default()).await.unwrap();
        assert!(reduced.is_empty());
    }
}
