//! Shared helpers for the integration tests: history builders and a
//! budget-limited mock generator that reports context overflows.

#![allow(dead_code)]

use async_trait::async_trait;
use contextual::{ContextError, Entry, Generator, GeneratorFactory, Result, Transcript};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Build `n` prompt/response turns: t1, r1 ... tn, rn
pub fn turns(n: usize) -> Vec<Entry> {
    let mut entries = Vec::new();
    for i in 1..=n {
        entries.push(Entry::prompt(format!("t{}", i)));
        entries.push(Entry::response(format!("r{}", i)));
    }
    entries
}

/// One instructions entry followed by `n` turns
pub fn history(n: usize) -> Transcript {
    let mut entries = vec![Entry::instructions("sys")];
    entries.extend(turns(n));
    Transcript::new(entries)
}

/// Generator that answers with a fixed reply while the transcript plus
/// prompt fits under a character budget, and reports a context overflow
/// otherwise. For one-shot generators (empty transcript) the check
/// degenerates to a prompt length budget.
pub struct BudgetGenerator {
    transcript: Transcript,
    char_limit: usize,
    reply: String,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Generator for BudgetGenerator {
    async fn respond(&mut self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let chars = self.transcript.character_count() + prompt.chars().count();
        if chars > self.char_limit {
            return Err(ContextError::ContextWindowExceeded {
                current: std::cmp::max(1, chars / 4),
                max: std::cmp::max(1, self.char_limit / 4),
            });
        }

        let mut entries = self.transcript.entries().to_vec();
        entries.push(Entry::prompt(prompt));
        entries.push(Entry::response(self.reply.clone()));
        self.transcript = Transcript::new(entries);

        Ok(self.reply.clone())
    }

    fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

/// Factory producing [`BudgetGenerator`]s that share one call counter and
/// record the transcript length of every generator they build, so tests can
/// assert on the retry machinery.
pub struct BudgetFactory {
    char_limit: usize,
    reply: String,
    pub calls: Arc<AtomicUsize>,
    pub made_lengths: Arc<Mutex<Vec<usize>>>,
}

impl BudgetFactory {
    pub fn new(char_limit: usize, reply: &str) -> Self {
        Self {
            char_limit,
            reply: reply.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            made_lengths: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl GeneratorFactory for BudgetFactory {
    fn make(&self, transcript: Transcript) -> Box<dyn Generator> {
        if let Ok(mut lengths) = self.made_lengths.lock() {
            lengths.push(transcript.len());
        }

        Box::new(BudgetGenerator {
            transcript,
            char_limit: self.char_limit,
            reply: self.reply.clone(),
            calls: self.calls.clone(),
        })
    }
}

/// Whether every instruction entry precedes every conversation entry
pub fn instructions_first(transcript: &Transcript) -> bool {
    let first_conversation = transcript
        .iter()
        .position(|entry| !entry.is_instructions())
        .unwrap_or(transcript.len());
    transcript
        .iter()
        .skip(first_conversation)
        .all(|entry| !entry.is_instructions())
}
