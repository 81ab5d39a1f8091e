//! # gate-check
//!
//! Hardware compatibility checking for local model deployment.
//!
//! This crate provides:
//! - Per-precision-tier requirement thresholds (fp8 and bf16)
//! - Pure evaluation of hardware facts against those thresholds
//! - Text report rendering and JSON export
//!
//! Evaluation never errors and never queries hardware itself; unmet
//! requirements are data, produced in fixed declaration order.
//!
//! ## Example
//!
//! ```rust
//! use gate_check::{evaluate, tier_passes, PrecisionTier};
//! use gate_core::{FactsProvider, SystemFactsProvider};
//!
//! let facts = SystemFactsProvider::new().collect().unwrap();
//! let checks = evaluate(PrecisionTier::Fp8, &facts);
//! println!("fp8 compatible: {}", tier_passes(&checks));
//! ```

pub mod evaluate;
pub mod report;
pub mod tier;

// Re-export main types
pub use evaluate::{evaluate, tier_passes, RequirementCheck};
pub use report::{render_report, CompatibilityReport};
pub use tier::{PrecisionTier, TierThresholds};
