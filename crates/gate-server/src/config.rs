//! Gateway configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{GatewayError, Result};

/// Environment variable holding the remote API key
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bind address for the HTTP server
    pub bind_address: String,

    /// HTTP server listen port
    pub http_port: u16,

    /// Remote API configuration
    pub api: ApiConfig,

    /// Local backend configuration
    pub local: LocalConfig,

    /// Enable CORS
    pub enable_cors: bool,
}

/// Remote API backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Chat completions endpoint
    pub endpoint: String,

    /// Model name sent to the remote API
    pub model: String,

    /// Fixed per-request timeout
    pub request_timeout: Duration,
}

/// Local backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Simulated per-request latency of the placeholder model call
    pub simulated_latency: Duration,

    /// Minimum available VRAM in GiB to consider local serving viable
    pub min_vram_gb: f64,

    /// Minimum available RAM in GiB to consider local serving viable
    pub min_ram_gb: f64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            http_port: 8000,
            api: ApiConfig::default(),
            local: LocalConfig::default(),
            enable_cors: true,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.deepseek.com/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            simulated_latency: Duration::from_millis(500),
            min_vram_gb: 80.0,
            min_ram_gb: 32.0,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: GatewayConfig = serde_yaml::from_str(&contents)
            .map_err(|e| GatewayError::Configuration(format!("Invalid config file: {}", e)))?;
        validate_config(&config).map_err(GatewayError::Configuration)?;
        Ok(config)
    }

    /// Read the remote API key from the environment, if present
    ///
    /// Absence of the key disables the API path entirely.
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
    }
}

/// Builder for GatewayConfig
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: GatewayConfig::default(),
        }
    }

    /// Set bind address
    pub fn bind_address(mut self, address: impl Into<String>) -> Self {
        self.config.bind_address = address.into();
        self
    }

    /// Set HTTP port
    pub fn http_port(mut self, port: u16) -> Self {
        self.config.http_port = port;
        self
    }

    /// Set the remote API endpoint
    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.api.endpoint = endpoint.into();
        self
    }

    /// Set the remote API request timeout
    pub fn api_timeout(mut self, timeout: Duration) -> Self {
        self.config.api.request_timeout = timeout;
        self
    }

    /// Set the simulated local latency
    pub fn simulated_latency(mut self, latency: Duration) -> Self {
        self.config.local.simulated_latency = latency;
        self
    }

    /// Enable or disable CORS
    pub fn enable_cors(mut self, enabled: bool) -> Self {
        self.config.enable_cors = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> GatewayConfig {
        self.config
    }
}

impl Default for GatewayConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate gateway configuration
pub fn validate_config(config: &GatewayConfig) -> std::result::Result<(), String> {
    if config.http_port == 0 {
        return Err("HTTP port must be greater than 0".to_string());
    }

    if config.bind_address.is_empty() {
        return Err("Bind address must not be empty".to_string());
    }

    if config.api.endpoint.is_empty() {
        return Err("API endpoint must not be empty".to_string());
    }

    if config.api.request_timeout.is_zero() {
        return Err("API request timeout must be greater than 0".to_string());
    }

    if config.local.min_vram_gb <= 0.0 || config.local.min_ram_gb <= 0.0 {
        return Err("Local capability thresholds must be greater than 0".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.http_port, 8000);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert!(config.enable_cors);
        assert_eq!(config.api.model, "deepseek-chat");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = GatewayConfigBuilder::new()
            .http_port(3000)
            .bind_address("127.0.0.1")
            .enable_cors(false)
            .api_timeout(Duration::from_secs(10))
            .build();

        assert_eq!(config.http_port, 3000);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert!(!config.enable_cors);
        assert_eq!(config.api.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_validation() {
        let mut config = GatewayConfig::default();
        assert!(validate_config(&config).is_ok());

        config.http_port = 0;
        assert!(validate_config(&config).is_err());

        config.http_port = 8000;
        config.api.request_timeout = Duration::ZERO;
        assert!(validate_config(&config).is_err());

        config.api.request_timeout = Duration::from_secs(30);
        config.local.min_ram_gb = 0.0;
        assert!(validate_config(&config).is_err());
    }
}
