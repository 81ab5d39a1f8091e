//! Model management operations

use chrono::Utc;
use gate_check::{evaluate, tier_passes, RequirementCheck};
use gate_core::{FactsProvider, HardwareFacts};
use tracing::{info, warn};

use crate::catalog::{catalog, find_build, ModelBuild};
use crate::store::{InstalledModel, ModelStore};
use crate::{ModelsError, Result};

/// Disk headroom multiplier applied on top of the build size
const DISK_BUFFER: f64 = 1.2;

/// Outcome of a pre-install requirement check
#[derive(Debug)]
pub struct InstallCheck {
    /// Tier checks from the evaluator, in declaration order
    pub checks: Vec<RequirementCheck>,

    /// Whether the tier passes on critical checks
    pub tier_ok: bool,

    /// Whether the disk has the build size plus headroom free
    pub disk_ok: bool,

    /// Free storage observed, in GiB
    pub storage_free_gb: f64,

    /// Storage needed including headroom, in GiB
    pub storage_needed_gb: f64,
}

impl InstallCheck {
    /// Whether the install can proceed
    pub fn ok(&self) -> bool {
        self.tier_ok && self.disk_ok
    }
}

/// Drives catalog, store, and requirement checks
pub struct ModelManager {
    store: ModelStore,
    facts: HardwareFacts,
}

impl ModelManager {
    /// Create a manager over the given store and facts provider
    pub fn new(store: ModelStore, facts_provider: &dyn FactsProvider) -> Result<Self> {
        let facts = facts_provider.collect()?;
        Ok(Self { store, facts })
    }

    /// The underlying store
    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Catalog entries with install/active status
    pub fn list(&self) -> Vec<(ModelBuild, bool, bool)> {
        catalog()
            .into_iter()
            .map(|build| {
                let installed = self.store.is_installed(&build.key);
                let active = self.store.active() == Some(build.key.as_str());
                (build, installed, active)
            })
            .collect()
    }

    /// Run the pre-install requirement check for a build
    pub fn check(&self, key: &str) -> Result<InstallCheck> {
        let build = find_build(key).ok_or_else(|| ModelsError::UnknownModel(key.to_string()))?;

        let checks = evaluate(build.precision, &self.facts);
        let tier_ok = tier_passes(&checks);

        let storage_needed_gb = build.size_gb * DISK_BUFFER;
        let disk_ok = self.facts.storage_free_gb >= storage_needed_gb;

        Ok(InstallCheck {
            checks,
            tier_ok,
            disk_ok,
            storage_free_gb: self.facts.storage_free_gb,
            storage_needed_gb,
        })
    }

    /// Record an install after verifying requirements
    ///
    /// The weight transfer itself is delegated to external tooling; this
    /// verifies the system can hold and serve the build, then records it.
    pub fn install(&mut self, key: &str) -> Result<()> {
        let build = find_build(key).ok_or_else(|| ModelsError::UnknownModel(key.to_string()))?;

        let check = self.check(key)?;
        if !check.disk_ok {
            warn!(
                "Insufficient storage for {}: {:.1}GiB free, {:.1}GiB needed",
                key, check.storage_free_gb, check.storage_needed_gb
            );
            return Err(ModelsError::RequirementsNotMet(format!(
                "need {:.1}GiB free storage, have {:.1}GiB",
                check.storage_needed_gb, check.storage_free_gb
            )));
        }
        if !check.tier_ok {
            let failed: Vec<&str> = check
                .checks
                .iter()
                .filter(|c| c.critical && !c.passed)
                .map(|c| c.name.as_str())
                .collect();
            return Err(ModelsError::RequirementsNotMet(failed.join(", ")));
        }

        let path = self.store.models_dir().join(&build.key);
        info!(
            "Installing {} ({:.0}GiB) to {}",
            build.name,
            build.size_gb,
            path.display()
        );

        self.store.record_install(
            key,
            InstalledModel {
                name: build.name,
                path,
                size_gb: build.size_gb,
                precision: build.precision,
                installed_at: Utc::now(),
            },
        )
    }

    /// Mark an installed model active
    pub fn set_active(&mut self, key: &str) -> Result<()> {
        self.store.set_active(key)
    }

    /// Remove an installed model record and its weights directory
    pub fn remove(&mut self, key: &str) -> Result<()> {
        let record = self.store.remove(key)?;
        if record.path.exists() {
            std::fs::remove_dir_all(&record.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_core::facts::testing::capable_facts;
    use gate_core::StaticFactsProvider;

    fn manager_with(facts: HardwareFacts) -> ModelManager {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::open(dir.path()).unwrap();
        // Leak the tempdir so the store path outlives the guard in tests
        std::mem::forget(dir);
        ModelManager::new(store, &StaticFactsProvider::new(facts)).unwrap()
    }

    #[test]
    fn test_list_reports_status() {
        let manager = manager_with(capable_facts());
        let listed = manager.list();
        assert_eq!(listed.len(), 2);
        for (_, installed, active) in listed {
            assert!(!installed);
            assert!(!active);
        }
    }

    #[test]
    fn test_check_passes_on_capable_system() {
        let manager = manager_with(capable_facts());
        let check = manager.check("deepseek-v3-fp8").unwrap();
        assert!(check.tier_ok);
        assert!(check.disk_ok);
        assert!(check.ok());
    }

    #[test]
    fn test_check_unknown_model() {
        let manager = manager_with(capable_facts());
        assert!(matches!(
            manager.check("mystery"),
            Err(ModelsError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_install_rejected_without_disk_headroom() {
        let mut facts = capable_facts();
        // Enough for the raw size but not the 20% buffer
        facts.storage_free_gb = 400.0;

        let mut manager = manager_with(facts);
        let check = manager.check("deepseek-v3-fp8").unwrap();
        assert!(!check.disk_ok);

        let result = manager.install("deepseek-v3-fp8");
        assert!(matches!(result, Err(ModelsError::RequirementsNotMet(_))));
    }

    #[test]
    fn test_install_and_activate() {
        let mut manager = manager_with(capable_facts());
        manager.install("deepseek-v3-fp8").unwrap();
        manager.set_active("deepseek-v3-fp8").unwrap();

        let listed = manager.list();
        let (_, installed, active) = listed
            .iter()
            .find(|(build, _, _)| build.key == "deepseek-v3-fp8")
            .unwrap();
        assert!(*installed);
        assert!(*active);
    }

    #[test]
    fn test_install_rejected_on_incapable_system() {
        let mut facts = capable_facts();
        facts.gpus.clear();
        facts.cuda_available = false;

        let mut manager = manager_with(facts);
        let result = manager.install("deepseek-v3-fp8");
        assert!(matches!(result, Err(ModelsError::RequirementsNotMet(_))));
    }

    #[test]
    fn test_remove_uninstalled_model() {
        let mut manager = manager_with(capable_facts());
        assert!(matches!(
            manager.remove("deepseek-v3-fp8"),
            Err(ModelsError::NotInstalled(_))
        ));
    }
}
