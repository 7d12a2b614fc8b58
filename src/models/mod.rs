// Models module

pub mod explanation;
pub mod lookup;

// Re-export commonly used types
pub use explanation::{ExplanationResponse, TranslatedWord, WordExplanation};
pub use lookup::{resolve_language, LookupRequest, FALLBACK_LANGUAGE};
