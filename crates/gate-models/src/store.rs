//! Install-state persistence
//!
//! State lives in a single JSON file under the models directory. Saves write
//! to a temporary file first and rename into place so a crash mid-save never
//! leaves a truncated state file.

use chrono::{DateTime, Utc};
use gate_check::PrecisionTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{ModelsError, Result};

const STATE_FILE: &str = "models_state.json";

/// A record of installed model weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledModel {
    /// Human-readable name
    pub name: String,

    /// Path to the weights on disk
    pub path: PathBuf,

    /// Size of the weights in GiB
    pub size_gb: f64,

    /// Precision tier of the build
    pub precision: PrecisionTier,

    /// When the install was recorded
    pub installed_at: DateTime<Utc>,
}

/// Persisted install state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    installed: BTreeMap<String, InstalledModel>,
    active: Option<String>,
}

/// JSON-backed store of installed models and the active selection
#[derive(Debug)]
pub struct ModelStore {
    models_dir: PathBuf,
    state: StoreState,
}

impl ModelStore {
    /// Open the store under the given models directory, creating it if needed
    pub fn open(models_dir: impl Into<PathBuf>) -> Result<Self> {
        let models_dir = models_dir.into();
        std::fs::create_dir_all(&models_dir)?;

        let state_path = models_dir.join(STATE_FILE);
        let state = if state_path.exists() {
            let contents = std::fs::read_to_string(&state_path)?;
            serde_json::from_str(&contents)
                .map_err(|e| ModelsError::Store(format!("Corrupt state file: {}", e)))?
        } else {
            debug!("No state file at {}, starting empty", state_path.display());
            StoreState::default()
        };

        Ok(Self { models_dir, state })
    }

    /// Directory the store manages
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Installed models in key order
    pub fn installed(&self) -> impl Iterator<Item = (&String, &InstalledModel)> {
        self.state.installed.iter()
    }

    /// Whether a model key is installed
    pub fn is_installed(&self, key: &str) -> bool {
        self.state.installed.contains_key(key)
    }

    /// Currently active model key, if any
    pub fn active(&self) -> Option<&str> {
        self.state.active.as_deref()
    }

    /// Record a completed install
    pub fn record_install(&mut self, key: &str, record: InstalledModel) -> Result<()> {
        if self.state.installed.contains_key(key) {
            return Err(ModelsError::AlreadyInstalled(key.to_string()));
        }
        self.state.installed.insert(key.to_string(), record);
        self.save()?;
        info!("Recorded install of {}", key);
        Ok(())
    }

    /// Mark a model as the active one for serving
    pub fn set_active(&mut self, key: &str) -> Result<()> {
        if !self.state.installed.contains_key(key) {
            return Err(ModelsError::NotInstalled(key.to_string()));
        }
        self.state.active = Some(key.to_string());
        self.save()?;
        info!("Active model set to {}", key);
        Ok(())
    }

    /// Remove an install record, clearing the active selection if it matched
    pub fn remove(&mut self, key: &str) -> Result<InstalledModel> {
        let record = self
            .state
            .installed
            .remove(key)
            .ok_or_else(|| ModelsError::NotInstalled(key.to_string()))?;

        if self.state.active.as_deref() == Some(key) {
            self.state.active = None;
        }
        self.save()?;
        info!("Removed {}", key);
        Ok(record)
    }

    fn save(&self) -> Result<()> {
        let state_path = self.models_dir.join(STATE_FILE);
        let tmp_path = self.models_dir.join(format!("{}.tmp", STATE_FILE));

        let json = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &state_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> InstalledModel {
        InstalledModel {
            name: name.to_string(),
            path: PathBuf::from(format!("/models/{}", name)),
            size_gb: 350.0,
            precision: PrecisionTier::Fp8,
            installed_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::open(dir.path()).unwrap();
        assert_eq!(store.installed().count(), 0);
        assert!(store.active().is_none());
        assert!(!store.is_installed("deepseek-v3-fp8"));
    }

    #[test]
    fn test_install_and_reload() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut store = ModelStore::open(dir.path()).unwrap();
            store
                .record_install("deepseek-v3-fp8", record("DeepSeek-V3-FP8"))
                .unwrap();
            store.set_active("deepseek-v3-fp8").unwrap();
        }

        // Reopen and verify the state round-tripped through the JSON file
        let store = ModelStore::open(dir.path()).unwrap();
        assert!(store.is_installed("deepseek-v3-fp8"));
        assert_eq!(store.active(), Some("deepseek-v3-fp8"));
        let (_, installed) = store.installed().next().unwrap();
        assert_eq!(installed.name, "DeepSeek-V3-FP8");
        assert_eq!(installed.precision, PrecisionTier::Fp8);
    }

    #[test]
    fn test_double_install_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ModelStore::open(dir.path()).unwrap();

        store.record_install("m", record("m")).unwrap();
        let result = store.record_install("m", record("m"));
        assert!(matches!(result, Err(ModelsError::AlreadyInstalled(_))));
    }

    #[test]
    fn test_set_active_requires_install() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ModelStore::open(dir.path()).unwrap();

        let result = store.set_active("ghost");
        assert!(matches!(result, Err(ModelsError::NotInstalled(_))));
    }

    #[test]
    fn test_remove_clears_active() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ModelStore::open(dir.path()).unwrap();

        store.record_install("m", record("m")).unwrap();
        store.set_active("m").unwrap();
        store.remove("m").unwrap();

        assert!(store.active().is_none());
        assert!(!store.is_installed("m"));
        assert!(matches!(
            store.remove("m"),
            Err(ModelsError::NotInstalled(_))
        ));
    }
}
