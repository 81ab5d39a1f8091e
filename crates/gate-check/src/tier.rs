//! Precision tiers and their resource thresholds

use serde::{Deserialize, Serialize};

/// Named precision configuration for local deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionTier {
    /// FP8 quantized weights, the low-resource configuration
    Fp8,
    /// BF16 full-precision weights, the high-resource configuration
    Bf16,
}

impl PrecisionTier {
    /// Resource thresholds for this tier
    pub fn thresholds(&self) -> TierThresholds {
        match self {
            PrecisionTier::Fp8 => TierThresholds {
                min_gpus: 1,
                min_vram_per_gpu_gb: 40.0,
                min_total_vram_gb: 80.0,
                min_ram_gb: 32.0,
                min_storage_gb: 400.0,
                min_compute_capability: 7.0,
            },
            PrecisionTier::Bf16 => TierThresholds {
                min_gpus: 2,
                min_vram_per_gpu_gb: 80.0,
                min_total_vram_gb: 160.0,
                min_ram_gb: 64.0,
                min_storage_gb: 1400.0,
                min_compute_capability: 7.0,
            },
        }
    }
}

impl std::fmt::Display for PrecisionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrecisionTier::Fp8 => f.write_str("fp8"),
            PrecisionTier::Bf16 => f.write_str("bf16"),
        }
    }
}

impl std::str::FromStr for PrecisionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fp8" => Ok(PrecisionTier::Fp8),
            "bf16" => Ok(PrecisionTier::Bf16),
            other => Err(format!("unknown precision tier: {}", other)),
        }
    }
}

/// Resource thresholds attached to a precision tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Minimum number of GPUs
    pub min_gpus: usize,

    /// Minimum VRAM on the largest single GPU, in GiB
    pub min_vram_per_gpu_gb: f64,

    /// Minimum VRAM across all GPUs, in GiB
    pub min_total_vram_gb: f64,

    /// Minimum total system RAM, in GiB
    pub min_ram_gb: f64,

    /// Minimum free storage, in GiB
    pub min_storage_gb: f64,

    /// Compute capability floor; advisory, not critical
    pub min_compute_capability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        let fp8 = PrecisionTier::Fp8.thresholds();
        assert_eq!(fp8.min_gpus, 1);
        assert_eq!(fp8.min_total_vram_gb, 80.0);
        assert_eq!(fp8.min_ram_gb, 32.0);

        let bf16 = PrecisionTier::Bf16.thresholds();
        assert_eq!(bf16.min_gpus, 2);
        assert_eq!(bf16.min_total_vram_gb, 160.0);
        assert_eq!(bf16.min_storage_gb, 1400.0);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("fp8".parse::<PrecisionTier>().unwrap(), PrecisionTier::Fp8);
        assert_eq!("BF16".parse::<PrecisionTier>().unwrap(), PrecisionTier::Bf16);
        assert!("int4".parse::<PrecisionTier>().is_err());
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(PrecisionTier::Fp8.to_string(), "fp8");
        assert_eq!(PrecisionTier::Bf16.to_string(), "bf16");
    }
}
