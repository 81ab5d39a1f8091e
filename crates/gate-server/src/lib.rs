//! # gate-server
//!
//! REST inference gateway with local/API fallback.
//!
//! This crate provides:
//! - A backend selector that prefers local model execution and falls back to
//!   a remote hosted API exactly once
//! - Aggregate performance metrics over all completed calls
//! - An axum HTTP surface: generate, metrics, health, system-specs
//!
//! ## Example
//!
//! ```rust,no_run
//! use gate_server::{GatewayConfig, GatewayServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatewayConfig::default();
//!     let server = GatewayServer::new(config)?;
//!     server.serve().await?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

pub mod backend;
pub mod config;
pub mod metrics;
pub mod selector;
pub mod server;

// Re-export main types
pub use backend::{ApiBackend, Backend, LocalBackend};
pub use config::{GatewayConfig, GatewayConfigBuilder};
pub use metrics::{GatewayMetrics, MetricsSnapshot};
pub use selector::BackendSelector;
pub use server::GatewayServer;

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur during gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Core error: {0}")]
    Core(#[from] gate_core::CoreError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Convert to HTTP status code
    pub fn to_status_code(&self) -> u16 {
        match self {
            GatewayError::Configuration(_) => 500,
            GatewayError::Server(_) => 500,
            GatewayError::Backend(_) => 502,
            GatewayError::InvalidRequest(_) => 400,
            GatewayError::ServiceUnavailable(_) => 503,
            GatewayError::Core(_) => 500,
            GatewayError::HttpClient(_) => 502,
            GatewayError::Json(_) => 400,
            GatewayError::Io(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_status_codes() {
        assert_eq!(
            GatewayError::ServiceUnavailable("no backend".to_string()).to_status_code(),
            503
        );
        assert_eq!(
            GatewayError::InvalidRequest("bad prompt".to_string()).to_status_code(),
            400
        );
        assert_eq!(
            GatewayError::Backend("upstream".to_string()).to_status_code(),
            502
        );
    }
}
