//! Inference backends
//!
//! Two backends exist: on-machine execution behind [`LocalBackend`] and the
//! remote hosted API behind [`ApiBackend`]. The local path keeps the model
//! call simulated; real tensor execution is delegated elsewhere.

use async_trait::async_trait;
use gate_core::{BackendKind, HardwareFacts, InferenceRequest, InferenceResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{ApiConfig, LocalConfig};
use crate::{GatewayError, Result};

/// A backend that can serve one generation call
#[async_trait]
pub trait Backend: Send + Sync {
    /// Which backend this is
    fn kind(&self) -> BackendKind;

    /// Whether the backend can currently serve requests
    fn is_available(&self) -> bool;

    /// Serve a single request
    async fn generate(&self, request: &InferenceRequest) -> Result<InferenceResult>;
}

/// On-machine model backend
///
/// The model invocation is a timed sleep plus a placeholder completion; the
/// availability decision and metrics behavior around it are real.
pub struct LocalBackend {
    config: LocalConfig,
    available: AtomicBool,
}

impl LocalBackend {
    /// Create a local backend, deciding availability from hardware facts
    pub fn new(config: LocalConfig, facts: &HardwareFacts) -> Self {
        let available = Self::can_run_model(&config, facts);
        if available {
            info!(
                "Local backend available: {} GPUs, {:.1}GiB VRAM",
                facts.gpu_count(),
                facts.total_vram_gb()
            );
        }
        Self {
            config,
            available: AtomicBool::new(available),
        }
    }

    /// Whether this machine clears the local serving thresholds
    fn can_run_model(config: &LocalConfig, facts: &HardwareFacts) -> bool {
        if !facts.cuda_available {
            warn!("CUDA not available, local backend disabled");
            return false;
        }
        if facts.available_vram_gb() < config.min_vram_gb {
            warn!(
                "Insufficient VRAM: {:.1}GiB < {:.1}GiB required",
                facts.available_vram_gb(),
                config.min_vram_gb
            );
            return false;
        }
        if facts.ram_available_gb < config.min_ram_gb {
            warn!(
                "Insufficient RAM: {:.1}GiB < {:.1}GiB required",
                facts.ram_available_gb, config.min_ram_gb
            );
            return false;
        }
        true
    }

    /// Mark the model as loaded and servable
    ///
    /// Real weight loading is delegated to external tooling; this flips the
    /// availability flag after a simulated load delay.
    pub async fn load_model(&self, facts: &HardwareFacts) -> Result<()> {
        if !Self::can_run_model(&self.config, facts) {
            return Err(GatewayError::ServiceUnavailable(
                "system does not meet requirements for local serving".to_string(),
            ));
        }

        info!("Loading local model");
        tokio::time::sleep(self.config.simulated_latency).await;
        self.available.store(true, Ordering::Relaxed);
        info!("Local model loaded");
        Ok(())
    }
}

#[async_trait]
impl Backend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    async fn generate(&self, request: &InferenceRequest) -> Result<InferenceResult> {
        if !self.is_available() {
            return Err(GatewayError::Backend(
                "local model not available".to_string(),
            ));
        }

        let start = Instant::now();

        // Placeholder for the real model call:
        //
        //   let inputs = tokenizer.encode(&request.prompt)?;
        //   let outputs = model.generate(inputs, request.max_tokens,
        //       request.temperature)?;
        //   let text = tokenizer.decode(&outputs)?;
        tokio::time::sleep(self.config.simulated_latency).await;

        let preview: String = request.prompt.chars().take(50).collect();
        let text = format!("Local completion for prompt '{}...'", preview);

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!("Local generation finished in {:.1}ms", elapsed_ms);

        Ok(
            InferenceResult::new(text, BackendKind::Local, elapsed_ms, request.max_tokens)
                .with_gpu_memory_delta(0.0),
        )
    }
}

/// Remote hosted API backend (OpenAI-style chat completions)
pub struct ApiBackend {
    config: ApiConfig,
    api_key: Option<String>,
    client: Client,
}

/// Chat completion request payload
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// Chat message
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat completion response payload
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl ApiBackend {
    /// Create an API backend; a missing key disables the path
    pub fn new(config: ApiConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                GatewayError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        if api_key.is_none() {
            warn!("No API key in environment, remote backend disabled");
        }

        Ok(Self {
            config,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl Backend for ApiBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Api
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: &InferenceRequest) -> Result<InferenceResult> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            GatewayError::ServiceUnavailable("remote API key not available".to_string())
        })?;

        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let start = Instant::now();

        debug!("Sending chat request to {}", self.config.endpoint);
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Backend(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GatewayError::Backend(format!(
                "API request failed: {} - {}",
                status, body
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Backend(format!("Invalid API response: {}", e)))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Backend("API response had no choices".to_string()))?;

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!("API generation finished in {:.1}ms", elapsed_ms);

        Ok(InferenceResult::new(
            text,
            BackendKind::Api,
            elapsed_ms,
            request.max_tokens,
        ))
    }
}
