//! High-level coordinator: input → prompt → generation client → answer → history.

use crate::llama::{GenerationClient, GenerationError, GenerationOptions};
use crate::postprocessing::strip_echo;
use crate::preprocessing::{Cleaner, InputError, PromptFormatter, ValidInput, EMPTY_INPUT_GUIDANCE};
use crate::session::{Session, Turn};
use super::types::{GenerationRequest, GenerationResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

pub struct Orchestrator {
    client: Arc<dyn GenerationClient>,
    formatter: PromptFormatter,
    options: GenerationOptions,
    timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        formatter: PromptFormatter,
        options: GenerationOptions,
    ) -> Self {
        Self {
            client,
            formatter,
            options,
            timeout: None,
        }
    }

    /// Bounds the whole encode → generate → decode pipeline.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn request(&self, raw_input: &str) -> GenerationRequest {
        GenerationRequest {
            raw_input: raw_input.to_string(),
            formatted_prompt: self.formatter.format(raw_input),
            max_new_tokens: self.options.max_new_tokens,
            sampling: self.options.do_sample,
        }
    }

    /// Answers one submission. Never fails: client errors come back inside
    /// the result.
    pub async fn respond(&self, raw_input: &str) -> GenerationResult {
        match Cleaner::validate(raw_input) {
            Ok(input) => self.answer(input).await,
            Err(InputError::EmptyInput) => Self::guidance(),
        }
    }

    /// Runs `respond` and records the exchange in the session history.
    /// Empty submissions leave the history untouched.
    pub async fn turn(&self, session: &mut Session, raw_input: &str) -> GenerationResult {
        match Cleaner::validate(raw_input) {
            Ok(input) => self.record_turn(session, input).await,
            Err(InputError::EmptyInput) => Self::guidance(),
        }
    }

    /// Generation for input that already passed validation.
    #[instrument(skip(self, input), fields(chars = input.as_str().len()))]
    pub async fn answer(&self, input: ValidInput<'_>) -> GenerationResult {
        let request = self.request(input.as_str());
        let started = Instant::now();

        match self.dispatch(&request).await {
            Ok(text) => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    answer_chars = text.len(),
                    "Generation finished"
                );
                GenerationResult::success(text)
            }
            Err(e) => {
                warn!(error = %e, "Generation failed");
                GenerationResult::failure(e.to_string())
            }
        }
    }

    /// `answer` plus the user and assistant turns appended to `session`.
    pub async fn record_turn(&self, session: &mut Session, input: ValidInput<'_>) -> GenerationResult {
        let result = self.answer(input).await;

        let history = session.history_mut();
        history.append(Turn::user(input.as_str()));
        history.append(Turn::assistant(result.display_text()));
        result
    }

    fn guidance() -> GenerationResult {
        debug!("Empty submission, returning guidance");
        GenerationResult::success(EMPTY_INPUT_GUIDANCE)
    }

    async fn dispatch(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.pipeline(request))
                .await
                .map_err(|_| GenerationError::Timeout { after: limit })?,
            None => self.pipeline(request).await,
        }
    }

    async fn pipeline(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let options = GenerationOptions {
            max_new_tokens: request.max_new_tokens,
            do_sample: request.sampling,
            ..self.options.clone()
        };

        let input_ids = self.client.encode(&request.formatted_prompt).await?;
        let output_ids = self.client.generate(&input_ids, &options).await?;
        let decoded = self.client.decode(&output_ids).await?;

        Ok(strip_echo(&decoded, &request.formatted_prompt))
    }
}
