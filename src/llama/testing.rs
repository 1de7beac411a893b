//! In-process generation clients for unit tests.

use super::{GenerationClient, GenerationError, GenerationOptions, Result, TokenIds};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Byte-level tokenizer whose "model" appends a fixed answer.
pub struct EchoClient {
    answer: String,
    calls: AtomicUsize,
}

impl EchoClient {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationClient for EchoClient {
    async fn encode(&self, text: &str) -> Result<TokenIds> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(text.bytes().map(u32::from).collect())
    }

    async fn generate(&self, tokens: &[u32], options: &GenerationOptions) -> Result<TokenIds> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut out = tokens.to_vec();
        out.extend(
            self.answer
                .bytes()
                .take(options.max_new_tokens as usize)
                .map(u32::from),
        );
        Ok(out)
    }

    async fn decode(&self, tokens: &[u32]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let bytes = tokens
            .iter()
            .map(|&t| {
                u8::try_from(t).map_err(|_| GenerationError::MalformedTokens {
                    details: format!("token {t} out of byte range"),
                })
            })
            .collect::<Result<Vec<u8>>>()?;
        String::from_utf8(bytes).map_err(|e| GenerationError::MalformedTokens {
            details: e.to_string(),
        })
    }
}

/// Every call fails the way an exhausted accelerator would.
pub struct FailingClient;

#[async_trait]
impl GenerationClient for FailingClient {
    async fn encode(&self, text: &str) -> Result<TokenIds> {
        Ok(text.bytes().map(u32::from).collect())
    }

    async fn generate(&self, _tokens: &[u32], _options: &GenerationOptions) -> Result<TokenIds> {
        Err(GenerationError::GenerationFailed {
            reason: "CUDA out of memory".to_string(),
        })
    }

    async fn decode(&self, _tokens: &[u32]) -> Result<String> {
        Ok(String::new())
    }
}

/// Sleeps before answering; used to exercise timeouts.
pub struct SlowClient {
    pub delay: Duration,
}

#[async_trait]
impl GenerationClient for SlowClient {
    async fn encode(&self, text: &str) -> Result<TokenIds> {
        Ok(text.bytes().map(u32::from).collect())
    }

    async fn generate(&self, tokens: &[u32], _options: &GenerationOptions) -> Result<TokenIds> {
        tokio::time::sleep(self.delay).await;
        Ok(tokens.to_vec())
    }

    async fn decode(&self, tokens: &[u32]) -> Result<String> {
        Ok(tokens.iter().filter_map(|&t| char::from_u32(t)).collect())
    }
}
