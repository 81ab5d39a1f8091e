//! Core inference types shared between the gateway and CLI tools

use serde::{Deserialize, Serialize};

/// Which backend actually served a completed call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// On-machine model execution
    Local,
    /// Remote hosted API
    Api,
}

impl BackendKind {
    /// Human-readable backend label used in responses and logs
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Local => "deepseek-v3-local",
            BackendKind::Api => "deepseek-v3-api",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single generation request, immutable for the duration of the call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Prompt text to complete
    pub prompt: String,

    /// Maximum number of tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature, typically in 0..=2
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Caller-supplied content label; carried through but not used for routing
    #[serde(default = "default_game_type")]
    pub game_type: String,

    /// Prefer the local backend when it is available
    #[serde(default = "default_use_local")]
    pub use_local: bool,
}

fn default_max_tokens() -> u32 {
    256
}

fn default_temperature() -> f32 {
    0.7
}

fn default_game_type() -> String {
    "general".to_string()
}

fn default_use_local() -> bool {
    true
}

impl InferenceRequest {
    /// Create a request with default generation parameters
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            game_type: default_game_type(),
            use_local: default_use_local(),
        }
    }

    /// Validate request parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.prompt.is_empty() {
            return Err("prompt must not be empty".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature {} out of range 0..=2",
                self.temperature
            ));
        }
        Ok(())
    }
}

/// The outcome of one completed generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Generated text
    pub text: String,

    /// Backend that served the call
    pub backend: BackendKind,

    /// Wall-clock time spent in the backend, in milliseconds
    pub elapsed_ms: f64,

    /// Derived throughput, zero when elapsed time is zero
    pub tokens_per_second: f64,

    /// GPU memory delta observed across the call, if measured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_memory_delta_gb: Option<f64>,
}

impl InferenceResult {
    /// Build a result, deriving throughput from token count and elapsed time
    pub fn new(text: impl Into<String>, backend: BackendKind, elapsed_ms: f64, tokens: u32) -> Self {
        let tokens_per_second = if elapsed_ms > 0.0 {
            tokens as f64 / (elapsed_ms / 1000.0)
        } else {
            0.0
        };

        Self {
            text: text.into(),
            backend,
            elapsed_ms,
            tokens_per_second,
            gpu_memory_delta_gb: None,
        }
    }

    /// Attach a GPU memory delta measurement
    pub fn with_gpu_memory_delta(mut self, delta_gb: f64) -> Self {
        self.gpu_memory_delta_gb = Some(delta_gb);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: InferenceRequest =
            serde_json::from_str(r#"{"prompt": "hello"}"#).unwrap();
        assert_eq!(request.prompt, "hello");
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.game_type, "general");
        assert!(request.use_local);
    }

    #[test]
    fn test_request_validation() {
        let mut request = InferenceRequest::new("hello");
        assert!(request.validate().is_ok());

        request.max_tokens = 0;
        assert!(request.validate().is_err());

        request.max_tokens = 32;
        request.temperature = 3.5;
        assert!(request.validate().is_err());

        request.temperature = 0.7;
        request.prompt.clear();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_result_throughput() {
        let result = InferenceResult::new("ok", BackendKind::Local, 500.0, 100);
        assert_eq!(result.tokens_per_second, 200.0);

        // Zero elapsed time must not divide by zero
        let result = InferenceResult::new("ok", BackendKind::Api, 0.0, 100);
        assert_eq!(result.tokens_per_second, 0.0);
    }

    #[test]
    fn test_backend_labels() {
        assert_eq!(BackendKind::Local.label(), "deepseek-v3-local");
        assert_eq!(BackendKind::Api.label(), "deepseek-v3-api");
    }
}
