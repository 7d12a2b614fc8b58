//! Prompt construction for word lookups.
//!
//! Prompts are pure functions of the lookup; the same request always yields
//! the same string.

use crate::models::LookupRequest;

/// Upper bound on the explanation length requested from the model.
pub const MAX_RESPONSE_WORDS: u32 = 300;

/// How the expected output structure is communicated to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// The provider enforces a response schema; the prompt only lists what to cover.
    Schema,
    /// The prompt itself spells out the JSON object to return.
    InlineJson,
}

/// Build the prompt for `request` in the given style.
pub fn build_prompt(request: &LookupRequest, style: PromptStyle) -> String {
    let word = request.word.as_str();
    let context = request.context.as_str();
    let lang = request.target_language();

    match style {
        PromptStyle::Schema => format!(
            r#"Explain the word "{word}" in {lang}. Provide:
- The word itself
- Etymology (if English word)
- Synonyms with translations to {lang}
- Antonyms with translations to {lang}
- Use {lang} to explain the meaning of the word "{word}" in the context: "{context}"
- Translation of the sentence to {lang}
Keep the total response under {MAX_RESPONSE_WORDS} words. Do not include markdown code blocks."#
        ),
        PromptStyle::InlineJson => format!(
            r#"Explain the word "{word}" in {lang}. Return a JSON object with these exact fields:
{{
  "word": "the word itself",
  "etymology": "etymology of the word in context (if applicable)",
  "synonyms": [{{"word": "synonym in original language", "translation": "translation"}}],
  "antonyms": [{{"word": "antonym in original language", "translation": "translation"}}],
  "context_meaning": "meaning of the word in this context",
  "translation": "translation of the sentence"
}}

Context sentence: "{context}"
Target language for translations: {lang}
Keep the total response under {MAX_RESPONSE_WORDS} words. Do not include markdown code blocks."#
        ),
    }
}
