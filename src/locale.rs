//! Locale identifiers for summarization output
//!
//! Summaries default to `en_US`. Any other locale requires explicit
//! summarization instructions from the caller; behavior for non-default
//! locales is never silently assumed.

use serde::{Deserialize, Serialize};

/// A locale identifier such as `en_US` or `fr_FR`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    identifier: String,
}

impl Locale {
    /// Create a locale from an identifier string
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    /// The default `en_US` locale
    pub fn en_us() -> Self {
        Self::new("en_US")
    }

    /// The locale identifier string
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether this is the default `en_US` locale
    pub fn is_default(&self) -> bool {
        self.identifier == "en_US"
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.identifier)
    }
}
