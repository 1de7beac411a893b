//! HTTP generation client for a llama.cpp-compatible model server.

use super::{GenerationClient, GenerationError, GenerationOptions, Result, TokenIds};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

#[derive(Serialize, Debug)]
struct TokenizeRequest<'a> {
    content: &'a str,
    add_special: bool,
}

#[derive(Deserialize, Debug)]
struct TokenizeResponse {
    tokens: Vec<u32>,
}

#[derive(Serialize, Debug)]
struct DetokenizeRequest<'a> {
    tokens: &'a [u32],
}

#[derive(Deserialize, Debug)]
struct DetokenizeResponse {
    content: String,
}

#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    prompt: &'a [u32],
    n_predict: u32,
    temperature: f32,
    ignore_eos: bool,
    return_tokens: bool,
    cache_prompt: bool,
    stream: bool,
}

impl<'a> CompletionRequest<'a> {
    fn new(prompt: &'a [u32], options: &GenerationOptions) -> Self {
        Self {
            prompt,
            n_predict: options.max_new_tokens,
            temperature: options.effective_temperature(),
            ignore_eos: !options.early_stopping,
            return_tokens: true,
            cache_prompt: false,
            stream: false,
        }
    }
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tokens: Vec<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoraAdapter {
    pub id: u32,
    #[serde(default)]
    pub path: String,
    pub scale: f32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LoraScale {
    pub id: u32,
    pub scale: f32,
}

/// Limits applied by the HTTP client itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub request: Option<Duration>,
}

#[derive(Clone, Debug)]
pub struct ServerClient {
    http: Client,
    base_url: Url,
    timeouts: Timeouts,
}

impl ServerClient {
    pub fn new(base_url: &Url, timeouts: Timeouts) -> Result<Self> {
        Self::build(Client::builder(), base_url, timeouts)
    }

    fn build(builder: ClientBuilder, base_url: &Url, timeouts: Timeouts) -> Result<Self> {
        let mut builder = builder.connect_timeout(timeouts.connect);
        if let Some(request) = timeouts.request {
            builder = builder.timeout(request);
        }
        let http = builder
            .build()
            .map_err(|e| GenerationError::InitializationFailed {
                endpoint: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url)?,
            timeouts,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fails unless the server reports itself ready to serve requests.
    #[instrument(skip(self), fields(server = %self.base_url))]
    pub async fn health(&self) -> Result<()> {
        let url = self.endpoint("health")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        check_status(response).await?;
        debug!("Model server is healthy");
        Ok(())
    }

    pub async fn adapters(&self) -> Result<Vec<LoraAdapter>> {
        let url = self.endpoint("lora-adapters")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let response = check_status(response).await?;
        response.json().await.map_err(|e| self.classify(e))
    }

    /// Applies the adapter whose path mentions `adapter` at full scale and
    /// disables every other adapter the server has loaded.
    #[instrument(skip(self))]
    pub async fn activate_adapter(&self, adapter: &str) -> Result<LoraAdapter> {
        let loaded = self.adapters().await?;
        let (selected, scales) = adapter_scales(&loaded, adapter)?;

        let url = self.endpoint("lora-adapters")?;
        let response = self
            .http
            .post(url)
            .json(&scales)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        check_status(response).await?;

        info!(id = selected.id, path = %selected.path, "Adapter activated");
        Ok(selected)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GenerationError::Transport {
                reason: format!("invalid endpoint `{path}`: {e}"),
            })
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let response = check_status(response).await?;
        response.json().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            let after = if e.is_connect() {
                self.timeouts.connect
            } else {
                self.timeouts.request.unwrap_or(self.timeouts.connect)
            };
            GenerationError::Timeout { after }
        } else if e.is_connect() {
            GenerationError::Connection {
                reason: e.to_string(),
            }
        } else if e.is_decode() {
            GenerationError::MalformedTokens {
                details: e.to_string(),
            }
        } else {
            GenerationError::Transport {
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl GenerationClient for ServerClient {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn encode(&self, text: &str) -> Result<TokenIds> {
        let response: TokenizeResponse = self
            .post_json(
                "tokenize",
                &TokenizeRequest {
                    content: text,
                    add_special: true,
                },
            )
            .await?;

        if response.tokens.is_empty() && !text.is_empty() {
            return Err(GenerationError::MalformedTokens {
                details: "tokenizer returned no tokens for non-empty text".to_string(),
            });
        }
        debug!(tokens = response.tokens.len(), "Prompt encoded");
        Ok(response.tokens)
    }

    #[instrument(skip(self, tokens), fields(prompt_tokens = tokens.len()))]
    async fn generate(&self, tokens: &[u32], options: &GenerationOptions) -> Result<TokenIds> {
        if tokens.is_empty() {
            return Err(GenerationError::MalformedTokens {
                details: "cannot generate from an empty prompt".to_string(),
            });
        }

        let request = CompletionRequest::new(tokens, options);
        let response: CompletionResponse = self.post_json("completion", &request).await?;
        join_completion(tokens, response)
    }

    #[instrument(skip(self, tokens), fields(tokens = tokens.len()))]
    async fn decode(&self, tokens: &[u32]) -> Result<String> {
        let response: DetokenizeResponse = self
            .post_json("detokenize", &DetokenizeRequest { tokens })
            .await?;
        Ok(response.content)
    }
}

/// Picks the adapter whose path mentions `adapter` and the scale list that
/// turns it fully on and every other loaded adapter off.
pub fn adapter_scales(
    loaded: &[LoraAdapter],
    adapter: &str,
) -> Result<(LoraAdapter, Vec<LoraScale>)> {
    let selected = loaded
        .iter()
        .find(|a| a.path.contains(adapter))
        .ok_or_else(|| GenerationError::AdapterNotLoaded {
            adapter: adapter.to_string(),
        })?;

    let scales = loaded
        .iter()
        .map(|a| LoraScale {
            id: a.id,
            scale: if a.id == selected.id { 1.0 } else { 0.0 },
        })
        .collect();

    Ok((
        LoraAdapter {
            scale: 1.0,
            ..selected.clone()
        },
        scales,
    ))
}

/// Prompt tokens followed by the generated ones, like causal-LM output.
fn join_completion(prompt: &[u32], response: CompletionResponse) -> Result<TokenIds> {
    if response.tokens.is_empty() && !response.content.is_empty() {
        warn!("Server returned text without token ids");
        return Err(GenerationError::MalformedTokens {
            details: "completion carried no token ids".to_string(),
        });
    }

    debug!(new_tokens = response.tokens.len(), "Completion received");
    let mut output = Vec::with_capacity(prompt.len() + response.tokens.len());
    output.extend_from_slice(prompt);
    output.extend(response.tokens);
    Ok(output)
}

fn with_trailing_slash(url: &Url) -> Result<Url> {
    if url.path().ends_with('/') {
        return Ok(url.clone());
    }
    let mut raw = url.to_string();
    raw.push('/');
    Url::parse(&raw).map_err(|e| GenerationError::InitializationFailed {
        endpoint: url.to_string(),
        reason: e.to_string(),
    })
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(GenerationError::Server {
        status: status.as_u16(),
        body,
    })
}
