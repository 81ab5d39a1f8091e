//! # gate-core
//!
//! Shared foundation for the infergate tooling:
//! - Inference request/result types used by the gateway
//! - Hardware facts model and collection providers
//! - Unified error type for cross-crate operations
//!
//! This crate is intentionally light on dependencies so that both the
//! long-running gateway and the one-shot CLI tools can build on it.

pub mod error;
pub mod facts;
pub mod types;

// Re-export main types
pub use error::{CoreError, Result};
pub use facts::{FactsProvider, GpuFacts, HardwareFacts, StaticFactsProvider, SystemFactsProvider};
pub use types::{BackendKind, InferenceRequest, InferenceResult};
