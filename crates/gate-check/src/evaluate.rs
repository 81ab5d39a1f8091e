//! Requirement evaluation against hardware facts

use gate_core::HardwareFacts;
use serde::{Deserialize, Serialize};

use crate::tier::PrecisionTier;

/// Result of a single requirement check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementCheck {
    /// Requirement name
    pub name: String,

    /// Required value, rendered for display
    pub required: String,

    /// Actual detected value, rendered for display
    pub actual: String,

    /// Whether the requirement is met
    pub passed: bool,

    /// Remediation text shown when the check fails
    pub remediation: String,

    /// Critical checks gate the tier; non-critical checks are advisory
    pub critical: bool,
}

impl RequirementCheck {
    fn new(
        name: &str,
        required: impl Into<String>,
        actual: impl Into<String>,
        passed: bool,
        remediation: &str,
        critical: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            required: required.into(),
            actual: actual.into(),
            passed,
            remediation: if passed {
                "OK".to_string()
            } else {
                remediation.to_string()
            },
            critical,
        }
    }
}

/// Evaluate all requirements for a tier against the supplied facts
///
/// Checks are returned in fixed declaration order, not sorted by severity.
/// This function is pure and never errors.
pub fn evaluate(tier: PrecisionTier, facts: &HardwareFacts) -> Vec<RequirementCheck> {
    let thresholds = tier.thresholds();
    let mut checks = Vec::new();

    checks.push(RequirementCheck::new(
        "Operating System",
        "Linux",
        &facts.os_name,
        facts.os_name == "Linux",
        "Local inference is only supported on Linux",
        true,
    ));

    checks.push(RequirementCheck::new(
        "CUDA Support",
        "Available",
        if facts.cuda_available {
            "Available"
        } else {
            "Not Available"
        },
        facts.cuda_available,
        "Install NVIDIA drivers and the CUDA toolkit",
        true,
    ));

    let gpu_count = facts.gpu_count();
    checks.push(RequirementCheck::new(
        "GPU Count",
        format!("{}+", thresholds.min_gpus),
        gpu_count.to_string(),
        gpu_count >= thresholds.min_gpus,
        &format!(
            "Need at least {} GPUs for {} inference",
            thresholds.min_gpus, tier
        ),
        true,
    ));

    if gpu_count > 0 {
        let max_gpu_vram = facts.max_gpu_vram_gb();
        checks.push(RequirementCheck::new(
            "GPU VRAM (per GPU)",
            format!("{}GiB", thresholds.min_vram_per_gpu_gb),
            format!("{:.1}GiB", max_gpu_vram),
            max_gpu_vram >= thresholds.min_vram_per_gpu_gb,
            &format!(
                "Need GPUs with at least {}GiB VRAM each",
                thresholds.min_vram_per_gpu_gb
            ),
            true,
        ));
    }

    let total_vram = facts.total_vram_gb();
    checks.push(RequirementCheck::new(
        "Total VRAM",
        format!("{}GiB", thresholds.min_total_vram_gb),
        format!("{:.1}GiB", total_vram),
        total_vram >= thresholds.min_total_vram_gb,
        &format!(
            "Need at least {}GiB total VRAM",
            thresholds.min_total_vram_gb
        ),
        true,
    ));

    checks.push(RequirementCheck::new(
        "System RAM",
        format!("{}GiB", thresholds.min_ram_gb),
        format!("{:.1}GiB", facts.ram_total_gb),
        facts.ram_total_gb >= thresholds.min_ram_gb,
        &format!("Need at least {}GiB system RAM", thresholds.min_ram_gb),
        true,
    ));

    checks.push(RequirementCheck::new(
        "Free Storage",
        format!("{}GiB", thresholds.min_storage_gb),
        format!("{:.1}GiB", facts.storage_free_gb),
        facts.storage_free_gb >= thresholds.min_storage_gb,
        &format!("Need at least {}GiB free storage", thresholds.min_storage_gb),
        true,
    ));

    // Advisory only: older GPUs still run, just without the fast kernels
    if let Some(min_capability) = facts.min_compute_capability() {
        checks.push(RequirementCheck::new(
            "CUDA Compute Capability",
            format!("{}+", thresholds.min_compute_capability),
            format!("{}", min_capability),
            min_capability >= thresholds.min_compute_capability,
            &format!(
                "GPUs with compute capability {}+ are recommended",
                thresholds.min_compute_capability
            ),
            false,
        ));
    }

    checks
}

/// A tier passes overall iff every critical check passes
pub fn tier_passes(checks: &[RequirementCheck]) -> bool {
    checks
        .iter()
        .filter(|check| check.critical)
        .all(|check| check.passed)
}
