use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Locale name used when the caller does not ask for a specific target language.
pub const FALLBACK_LANGUAGE: &str = "Traditional Chinese";

/// Language codes that mean "no preference" and resolve to [`FALLBACK_LANGUAGE`].
const DEFAULT_LOCALE_CODES: [&str; 2] = ["en", "en-US"];

/// A word lookup sent by the browser extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    pub word: String,
    pub context: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub timestamp: String,
}

impl LookupRequest {
    /// Validate the decoded lookup.
    pub fn validate(&self) -> Result<(), String> {
        if self.word.trim().is_empty() {
            return Err("Word cannot be empty".to_string());
        }

        Ok(())
    }

    /// Target language for the explanation.
    pub fn target_language(&self) -> &str {
        resolve_language(&self.language)
    }

    /// Client-side timestamp, if it parses as RFC 3339.
    pub fn client_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.timestamp.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Empty and English default-locale codes map to the fallback; anything else passes through.
pub fn resolve_language(language: &str) -> &str {
    if language.is_empty() || DEFAULT_LOCALE_CODES.contains(&language) {
        FALLBACK_LANGUAGE
    } else {
        language
    }
}
