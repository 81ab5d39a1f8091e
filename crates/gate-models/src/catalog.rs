//! Built-in catalog of known model builds

use gate_check::PrecisionTier;
use serde::{Deserialize, Serialize};

/// A downloadable model build and its resource needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBuild {
    /// Catalog key, e.g. `deepseek-v3-fp8`
    pub key: String,

    /// Human-readable name
    pub name: String,

    /// Upstream repository id
    pub repo_id: String,

    /// On-disk size of the weights in GiB
    pub size_gb: f64,

    /// Minimum total VRAM in GiB
    pub min_vram_gb: f64,

    /// Minimum system RAM in GiB
    pub min_ram_gb: f64,

    /// Precision tier this build targets
    pub precision: PrecisionTier,

    /// Short description
    pub description: String,
}

/// The known model builds, in catalog order
pub fn catalog() -> Vec<ModelBuild> {
    vec![
        ModelBuild {
            key: "deepseek-v3-fp8".to_string(),
            name: "DeepSeek-V3-FP8".to_string(),
            repo_id: "deepseek-ai/DeepSeek-V3".to_string(),
            size_gb: 350.0,
            min_vram_gb: 80.0,
            min_ram_gb: 32.0,
            precision: PrecisionTier::Fp8,
            description: "FP8 quantized weights, recommended for inference".to_string(),
        },
        ModelBuild {
            key: "deepseek-v3-base".to_string(),
            name: "DeepSeek-V3-Base".to_string(),
            repo_id: "deepseek-ai/DeepSeek-V3-Base".to_string(),
            size_gb: 1300.0,
            min_vram_gb: 160.0,
            min_ram_gb: 64.0,
            precision: PrecisionTier::Bf16,
            description: "Full-precision base weights".to_string(),
        },
    ]
}

/// Look up a build by catalog key
pub fn find_build(key: &str) -> Option<ModelBuild> {
    catalog().into_iter().find(|build| build.key == key)
}
