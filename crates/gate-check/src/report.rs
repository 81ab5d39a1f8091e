//! Compatibility report rendering and export

use gate_core::{HardwareFacts, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::evaluate::{evaluate, tier_passes, RequirementCheck};
use crate::tier::PrecisionTier;

/// Full compatibility report across both tiers, suitable for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    /// Facts the report was evaluated against
    pub facts: HardwareFacts,

    /// fp8 tier checks
    pub fp8_checks: Vec<RequirementCheck>,

    /// bf16 tier checks
    pub bf16_checks: Vec<RequirementCheck>,

    /// Whether the fp8 tier passes on critical checks
    pub fp8_compatible: bool,

    /// Whether the bf16 tier passes on critical checks
    pub bf16_compatible: bool,
}

impl CompatibilityReport {
    /// Evaluate both tiers against the given facts
    pub fn evaluate(facts: HardwareFacts) -> Self {
        let fp8_checks = evaluate(PrecisionTier::Fp8, &facts);
        let bf16_checks = evaluate(PrecisionTier::Bf16, &facts);
        let fp8_compatible = tier_passes(&fp8_checks);
        let bf16_compatible = tier_passes(&bf16_checks);

        Self {
            facts,
            fp8_checks,
            bf16_checks,
            fp8_compatible,
            bf16_compatible,
        }
    }

    /// Checks for a specific tier
    pub fn checks(&self, tier: PrecisionTier) -> &[RequirementCheck] {
        match tier {
            PrecisionTier::Fp8 => &self.fp8_checks,
            PrecisionTier::Bf16 => &self.bf16_checks,
        }
    }

    /// Whether a specific tier is compatible
    pub fn compatible(&self, tier: PrecisionTier) -> bool {
        match tier {
            PrecisionTier::Fp8 => self.fp8_compatible,
            PrecisionTier::Bf16 => self.bf16_compatible,
        }
    }

    /// Export the report as pretty-printed JSON
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        info!("Report exported to {}", path.as_ref().display());
        Ok(())
    }
}

/// Render a human-readable report to a string
pub fn render_report(report: &CompatibilityReport) -> String {
    let mut out = String::new();
    let facts = &report.facts;

    out.push_str("SYSTEM COMPATIBILITY REPORT\n");
    out.push_str(&"=".repeat(60));
    out.push('\n');

    out.push_str(&format!("OS: {} {}\n", facts.os_name, facts.os_version));
    out.push_str(&format!(
        "CPU: {} ({} cores, {} threads)\n",
        facts.cpu_model, facts.cpu_cores, facts.cpu_threads
    ));
    out.push_str(&format!(
        "RAM: {:.1}GiB total, {:.1}GiB available\n",
        facts.ram_total_gb, facts.ram_available_gb
    ));
    out.push_str(&format!("Storage: {:.1}GiB free\n", facts.storage_free_gb));
    out.push_str(&format!(
        "CUDA: {}\n",
        match &facts.cuda_version {
            Some(version) => version.as_str(),
            None if facts.cuda_available => "available",
            None => "not available",
        }
    ));

    out.push('\n');
    if facts.gpus.is_empty() {
        out.push_str("No GPUs detected\n");
    } else {
        for gpu in &facts.gpus {
            out.push_str(&format!(
                "GPU {}: {} ({:.1}GiB VRAM, {:.1}GiB free)\n",
                gpu.index, gpu.name, gpu.vram_total_gb, gpu.vram_free_gb
            ));
            if let Some(capability) = gpu.compute_capability {
                out.push_str(&format!("  compute capability: {}\n", capability));
            }
        }
    }

    for (tier, checks, compatible) in [
        (PrecisionTier::Fp8, &report.fp8_checks, report.fp8_compatible),
        (
            PrecisionTier::Bf16,
            &report.bf16_checks,
            report.bf16_compatible,
        ),
    ] {
        out.push_str(&format!("\n{} REQUIREMENTS\n", tier.to_string().to_uppercase()));
        for check in checks {
            let status = if check.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "[{}] {}: {} (required: {})\n",
                status, check.name, check.actual, check.required
            ));
            if !check.passed {
                out.push_str(&format!("       {}\n", check.remediation));
            }
        }
        let passed = checks.iter().filter(|check| check.passed).count();
        out.push_str(&format!(
            "{} compatibility: {}/{} requirements met ({})\n",
            tier,
            passed,
            checks.len(),
            if compatible { "COMPATIBLE" } else { "NOT COMPATIBLE" }
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_core::facts::testing::capable_facts;

    #[test]
    fn test_report_evaluates_both_tiers() {
        let report = CompatibilityReport::evaluate(capable_facts());
        assert!(report.fp8_compatible);
        assert!(report.bf16_compatible);
        assert!(!report.fp8_checks.is_empty());
        assert!(!report.bf16_checks.is_empty());
    }

    #[test]
    fn test_render_report_mentions_failures() {
        let mut facts = capable_facts();
        facts.ram_total_gb = 16.0;

        let report = CompatibilityReport::evaluate(facts);
        assert!(!report.fp8_compatible);

        let rendered = render_report(&report);
        assert!(rendered.contains("[FAIL] System RAM"));
        assert!(rendered.contains("NOT COMPATIBLE"));
    }

    #[test]
    fn test_report_json_roundtrip() {
        let report = CompatibilityReport::evaluate(capable_facts());
        let json = serde_json::to_string(&report).unwrap();
        let parsed: CompatibilityReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.fp8_compatible, report.fp8_compatible);
        assert_eq!(parsed.fp8_checks.len(), report.fp8_checks.len());
    }
}
