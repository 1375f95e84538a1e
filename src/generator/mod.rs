//! Generator boundary: the opaque language-model capability
//!
//! A [`Generator`] turns a prompt plus its bound transcript into a response
//! or fails with [`crate::ContextError::ContextWindowExceeded`]. The session
//! treats its generator as exclusively owned and replaces it wholesale on
//! every reduction, which is why construction goes through a
//! [`GeneratorFactory`] rather than a mutation API.

pub mod ollama;

pub use ollama::{OllamaGenerator, OllamaGeneratorFactory};

use crate::errors::Result;
use crate::transcript::Transcript;
use async_trait::async_trait;

/// A live language-model session bound to a transcript
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a response to the prompt, appending the exchanged turns to
    /// the bound transcript on success.
    ///
    /// Fails with `ContextError::ContextWindowExceeded` when the transcript
    /// plus prompt no longer fits; all other errors are opaque to the
    /// retry machinery and propagate to the caller unchanged.
    async fn respond(&mut self, prompt: &str) -> Result<String>;

    /// The transcript this generator is currently bound to
    fn transcript(&self) -> &Transcript;
}

/// Constructs fresh generators bound to a given transcript.
///
/// The session uses this to rebuild its generator after each reduction; the
/// resilient summarizer, topic detector, and state extractor use it to spin
/// up one-shot generators for their internal calls.
pub trait GeneratorFactory: Send + Sync {
    /// Create a generator bound to the given transcript
    fn make(&self, transcript: Transcript) -> Box<dyn Generator>;
}

/// Run a single stateless generation call against a fresh generator
pub(crate) async fn generate_once(
    factory: &dyn GeneratorFactory,
    prompt: &str,
) -> Result<String> {
    let mut generator = factory.make(Transcript::default());
    generator.respond(prompt).await
}
