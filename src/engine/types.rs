//! Shared structs.

use serde::{Deserialize, Serialize};

/// One dispatch to the generation client. Built per call, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub raw_input: String,
    pub formatted_prompt: String,
    pub max_new_tokens: u32,
    pub sampling: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// What the chat transcript shows for this result.
    pub fn display_text(&self) -> String {
        match &self.error {
            Some(error) => format!("An error occurred: {error}"),
            None => self.text.clone(),
        }
    }
}
