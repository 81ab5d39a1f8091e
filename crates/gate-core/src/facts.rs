//! Hardware facts model and collection providers
//!
//! Requirement evaluation never introspects the machine itself; it consumes a
//! flat [`HardwareFacts`] record produced by a [`FactsProvider`]. This keeps
//! the evaluation logic pure and lets tests supply synthetic hardware.

use serde::{Deserialize, Serialize};
use sysinfo::{Disks, System};
use tracing::{debug, warn};

use crate::{CoreError, Result};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Facts about a single GPU, as reported by driver introspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuFacts {
    /// Device ordinal
    pub index: u32,

    /// Marketing name of the device
    pub name: String,

    /// Total VRAM in GiB
    pub vram_total_gb: f64,

    /// Free VRAM in GiB
    pub vram_free_gb: f64,

    /// Current utilization percentage
    pub utilization_percent: f64,

    /// Core temperature in Celsius, if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,

    /// Driver version string, if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_version: Option<String>,

    /// CUDA compute capability (e.g. 9.0), if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_capability: Option<f64>,
}

/// Flat record of detected hardware attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareFacts {
    /// CPU model string
    pub cpu_model: String,

    /// Physical core count
    pub cpu_cores: usize,

    /// Logical thread count
    pub cpu_threads: usize,

    /// Total system RAM in GiB
    pub ram_total_gb: f64,

    /// Available system RAM in GiB
    pub ram_available_gb: f64,

    /// Free storage on the largest volume in GiB
    pub storage_free_gb: f64,

    /// Operating system name
    pub os_name: String,

    /// Operating system version
    pub os_version: String,

    /// Whether a CUDA-capable driver stack is present
    pub cuda_available: bool,

    /// CUDA toolkit version, if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuda_version: Option<String>,

    /// Detected GPUs
    #[serde(default)]
    pub gpus: Vec<GpuFacts>,
}

impl HardwareFacts {
    /// Number of detected GPUs
    pub fn gpu_count(&self) -> usize {
        self.gpus.len()
    }

    /// Sum of VRAM across all detected GPUs in GiB
    pub fn total_vram_gb(&self) -> f64 {
        self.gpus.iter().map(|gpu| gpu.vram_total_gb).sum()
    }

    /// Sum of free VRAM across all detected GPUs in GiB
    pub fn available_vram_gb(&self) -> f64 {
        self.gpus.iter().map(|gpu| gpu.vram_free_gb).sum()
    }

    /// Largest single-GPU VRAM in GiB, zero when no GPUs are present
    pub fn max_gpu_vram_gb(&self) -> f64 {
        self.gpus
            .iter()
            .map(|gpu| gpu.vram_total_gb)
            .fold(0.0, f64::max)
    }

    /// Lowest reported compute capability across GPUs, if any report one
    pub fn min_compute_capability(&self) -> Option<f64> {
        self.gpus
            .iter()
            .filter_map(|gpu| gpu.compute_capability)
            .fold(None, |min, cap| {
                Some(match min {
                    Some(m) if m <= cap => m,
                    _ => cap,
                })
            })
    }
}

/// Source of hardware facts
///
/// The system provider covers CPU/RAM/storage/OS; GPU facts come from an
/// external driver collaborator and are merged in by the caller.
pub trait FactsProvider: Send + Sync {
    /// Collect a fresh facts record
    fn collect(&self) -> Result<HardwareFacts>;
}

/// Facts provider backed by OS introspection via sysinfo
#[derive(Debug, Default)]
pub struct SystemFactsProvider {
    /// GPU facts supplied by the driver collaborator, merged into each collect
    gpus: Vec<GpuFacts>,
}

impl SystemFactsProvider {
    /// Create a provider with no GPU facts
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that merges the given GPU facts into each record
    pub fn with_gpus(gpus: Vec<GpuFacts>) -> Self {
        Self { gpus }
    }
}

impl FactsProvider for SystemFactsProvider {
    fn collect(&self) -> Result<HardwareFacts> {
        let sys = System::new_all();

        let cpu_model = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        let cpu_threads = sys.cpus().len();
        let cpu_cores = sys.physical_core_count().unwrap_or(cpu_threads);

        let disks = Disks::new_with_refreshed_list();
        let storage_free_gb = disks
            .list()
            .iter()
            .map(|disk| disk.available_space())
            .max()
            .unwrap_or(0) as f64
            / BYTES_PER_GIB;

        if disks.list().is_empty() {
            warn!("No disks reported by the OS, storage facts will be zero");
        }

        let cuda_available = !self.gpus.is_empty();

        let facts = HardwareFacts {
            cpu_model,
            cpu_cores,
            cpu_threads,
            ram_total_gb: sys.total_memory() as f64 / BYTES_PER_GIB,
            ram_available_gb: sys.available_memory() as f64 / BYTES_PER_GIB,
            storage_free_gb,
            os_name: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            cuda_available,
            cuda_version: None,
            gpus: self.gpus.clone(),
        };

        debug!(
            "Collected hardware facts: {} cores, {:.1}GiB RAM, {} GPUs",
            facts.cpu_cores,
            facts.ram_total_gb,
            facts.gpu_count()
        );

        Ok(facts)
    }
}

/// Facts provider that returns a fixed record
///
/// Used by tests and by the checker's `--facts` JSON input.
#[derive(Debug, Clone)]
pub struct StaticFactsProvider {
    facts: HardwareFacts,
}

impl StaticFactsProvider {
    /// Wrap a fixed facts record
    pub fn new(facts: HardwareFacts) -> Self {
        Self { facts }
    }

    /// Load a facts record from a JSON file
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CoreError::introspection(format!(
                "Failed to read facts file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let facts: HardwareFacts = serde_json::from_str(&contents)?;
        Ok(Self::new(facts))
    }
}

impl FactsProvider for StaticFactsProvider {
    fn collect(&self) -> Result<HardwareFacts> {
        Ok(self.facts.clone())
    }
}

/// Synthetic facts builders shared with dependent crates' tests
#[cfg(any(feature = "testing", test))]
pub mod testing {
    use super::*;

    /// Synthetic facts for a machine that clears the fp8 thresholds
    pub fn capable_facts() -> HardwareFacts {
        HardwareFacts {
            cpu_model: "Test CPU".to_string(),
            cpu_cores: 32,
            cpu_threads: 64,
            ram_total_gb: 128.0,
            ram_available_gb: 100.0,
            storage_free_gb: 2000.0,
            os_name: "Linux".to_string(),
            os_version: "6.1".to_string(),
            cuda_available: true,
            cuda_version: Some("12.2".to_string()),
            gpus: vec![
                GpuFacts {
                    index: 0,
                    name: "Test GPU 0".to_string(),
                    vram_total_gb: 80.0,
                    vram_free_gb: 78.0,
                    utilization_percent: 5.0,
                    temperature_c: Some(45.0),
                    driver_version: Some("550.54".to_string()),
                    compute_capability: Some(9.0),
                },
                GpuFacts {
                    index: 1,
                    name: "Test GPU 1".to_string(),
                    vram_total_gb: 80.0,
                    vram_free_gb: 80.0,
                    utilization_percent: 0.0,
                    temperature_c: Some(40.0),
                    driver_version: Some("550.54".to_string()),
                    compute_capability: Some(9.0),
                },
            ],
        }
    }
}
