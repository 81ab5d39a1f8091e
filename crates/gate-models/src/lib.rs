//! # gate-models
//!
//! Model weight catalog and install-state management.
//!
//! This crate provides:
//! - A built-in catalog of known model builds with their resource needs
//! - A JSON-backed store tracking installed weights and the active model
//! - Pre-install requirement checks driven by the gate-check evaluator
//!
//! The byte transfer of the weights themselves is delegated to external
//! tooling; this crate manages the surrounding state.

use thiserror::Error;

pub mod catalog;
pub mod manager;
pub mod store;

// Re-export main types
pub use catalog::{catalog, find_build, ModelBuild};
pub use manager::{InstallCheck, ModelManager};
pub use store::{InstalledModel, ModelStore};

/// Result type for model management operations
pub type Result<T> = std::result::Result<T, ModelsError>;

/// Errors that can occur during model management
#[derive(Error, Debug)]
pub enum ModelsError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Model not installed: {0}")]
    NotInstalled(String),

    #[error("Model already installed: {0}")]
    AlreadyInstalled(String),

    #[error("System requirements not met: {0}")]
    RequirementsNotMet(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Core error: {0}")]
    Core(#[from] gate_core::CoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ModelsError::UnknownModel("mystery-model".to_string());
        assert_eq!(error.to_string(), "Unknown model: mystery-model");

        let error = ModelsError::NotInstalled("deepseek-v3-fp8".to_string());
        assert_eq!(error.to_string(), "Model not installed: deepseek-v3-fp8");
    }
}
