use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Body returned to the caller on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}

impl ExplanationResponse {
    pub fn new(explanation: impl Into<String>) -> Self {
        Self {
            explanation: explanation.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.explanation.is_empty()
    }
}

/// Shape the model is asked to produce.
///
/// The relay forwards model output untouched; this type documents the contract
/// and lets callers decode the `explanation` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordExplanation {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etymology: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<TranslatedWord>,
    #[serde(default)]
    pub antonyms: Vec<TranslatedWord>,
    pub context_meaning: String,
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedWord {
    pub word: String,
    pub translation: String,
}

impl WordExplanation {
    /// Response schema in the OpenAPI subset accepted by Gemini's `responseSchema`.
    pub fn response_schema() -> Value {
        let translated_word = |what: &str| {
            json!({
                "type": "OBJECT",
                "properties": {
                    "word": {
                        "type": "STRING",
                        "description": format!("{} in original language", what)
                    },
                    "translation": {
                        "type": "STRING",
                        "description": format!("Translation of the {}", what.to_lowercase())
                    }
                },
                "required": ["word", "translation"]
            })
        };

        json!({
            "type": "OBJECT",
            "properties": {
                "word": { "type": "STRING", "description": "The word itself" },
                "etymology": { "type": "STRING", "description": "The etymology of the word in context" },
                "synonyms": {
                    "type": "ARRAY",
                    "description": "A list of synonyms",
                    "items": translated_word("Synonym")
                },
                "antonyms": {
                    "type": "ARRAY",
                    "description": "A list of antonyms",
                    "items": translated_word("Antonym")
                },
                "context_meaning": { "type": "STRING", "description": "The meaning of the word in the context" },
                "translation": { "type": "STRING", "description": "The translation of the sentence" }
            },
            "required": ["word", "context_meaning", "translation"]
        })
    }
}
