use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod loader;
pub mod server;

pub use loader::ModelLoader;
pub use server::ServerClient;

/**
 * Generation client boundary
 *
 * The model and its tokenizer live outside this crate. Everything the
 * orchestrator needs from them is the encode → generate → decode pipeline
 * below, with failures reported as values instead of panics.
 */

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Failed to initialize generation client for {endpoint}: {reason}")]
    InitializationFailed { endpoint: String, reason: String },
    #[error("Adapter `{adapter}` is not loaded on the model server")]
    AdapterNotLoaded { adapter: String },
    #[error("Generation timed out after {after:?}")]
    Timeout { after: Duration },
    #[error("Connection error - unable to reach the model server: {reason}")]
    Connection { reason: String },
    #[error("Request to the model server failed: {reason}")]
    Transport { reason: String },
    #[error("Model server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("Malformed tokens: {details}")]
    MalformedTokens { details: String },
    #[error("Text generation failed: {reason}")]
    GenerationFailed { reason: String },
}

pub type Result<T> = std::result::Result<T, GenerationError>;

/// Token ids as produced by the model's tokenizer.
pub type TokenIds = Vec<u32>;

/// Decoding options passed to every `generate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub max_new_tokens: u32,
    pub early_stopping: bool,
    pub do_sample: bool,
    /// Only consulted when `do_sample` is set.
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_new_tokens: 200,
            early_stopping: true,
            do_sample: false,
            temperature: 0.7,
        }
    }
}

impl GenerationOptions {
    /// Temperature actually sent to the sampler; zero means greedy.
    pub fn effective_temperature(&self) -> f32 {
        if self.do_sample {
            self.temperature
        } else {
            0.0
        }
    }
}

/// A loaded model plus tokenizer.
///
/// `generate` returns the prompt tokens followed by the new tokens, so the
/// decoded output echoes the prompt the way causal-LM generation does.
/// Implementations shared between sessions must keep requests isolated:
/// all per-request state travels in the arguments.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn encode(&self, text: &str) -> Result<TokenIds>;
    async fn generate(&self, tokens: &[u32], options: &GenerationOptions) -> Result<TokenIds>;
    async fn decode(&self, tokens: &[u32]) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod testing;
