//! Shared application state

use std::sync::Arc;

use anyhow::Context;
use coffer_common::{Address, AssetId, Clock, SystemClock};
use coffer_custody::{
    CustodyLedger, LedgerConfig, MemoryAssetRegistry, MemoryCustodyLedger, RegistryCatalog,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use crate::config::{Configuration, RegistrySeed};

/// State shared by every HTTP worker
pub struct AppState {
    pub ledger: Arc<dyn CustodyLedger>,
    pub catalog: Arc<RegistryCatalog>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        custodian: Address,
        ledger_config: LedgerConfig,
        catalog: Arc<RegistryCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ledger = MemoryCustodyLedger::new(custodian, catalog.clone(), ledger_config)
            .with_clock(clock);
        Self {
            ledger: Arc::new(ledger),
            catalog,
            metrics: None,
        }
    }

    /// Build state from configuration, hosting and seeding configured registries
    pub fn from_configuration(configuration: &Configuration) -> anyhow::Result<Self> {
        let catalog = Arc::new(RegistryCatalog::new());
        seed_registries(&catalog, &configuration.registries()?)?;

        Ok(Self::new(
            configuration.custodian()?,
            configuration.ledger_config()?,
            catalog,
            Arc::new(SystemClock),
        ))
    }

    pub fn with_metrics(self, metrics: Option<PrometheusHandle>) -> Self {
        Self { metrics, ..self }
    }
}

/// Host each configured registry and mint its seed assets
pub fn seed_registries(catalog: &RegistryCatalog, seeds: &[RegistrySeed]) -> anyhow::Result<()> {
    for seed in seeds {
        let address: Address = seed
            .address
            .parse()
            .with_context(|| format!("invalid registry address '{}'", seed.address))?;
        let registry = Arc::new(MemoryAssetRegistry::new(address.clone()));

        for asset in &seed.assets {
            let owner: Address = asset
                .owner
                .parse()
                .with_context(|| format!("invalid owner for {}::{}", address, asset.id))?;
            registry
                .mint(&owner, AssetId(asset.id))
                .with_context(|| format!("failed to seed {}::{}", address, asset.id))?;
        }

        info!(
            registry = %address,
            assets = seed.assets.len(),
            "Hosting asset registry"
        );
        catalog.register(registry);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use coffer_common::AssetRegistry;

    use super::*;
    use crate::config::AssetSeed;

    #[test]
    fn test_seed_registries() {
        let catalog = RegistryCatalog::new();
        let seeds = vec![RegistrySeed {
            address: "punks".to_string(),
            assets: vec![AssetSeed {
                id: 1,
                owner: "alice".to_string(),
            }],
        }];

        seed_registries(&catalog, &seeds).unwrap();
        let registry = catalog.get(&Address::from("punks")).unwrap();
        assert_eq!(registry.owner_of(AssetId(1)).unwrap(), Address::from("alice"));
    }

    #[test]
    fn test_seed_duplicate_asset_fails() {
        let catalog = RegistryCatalog::new();
        let seeds = vec![RegistrySeed {
            address: "punks".to_string(),
            assets: vec![
                AssetSeed {
                    id: 1,
                    owner: "alice".to_string(),
                },
                AssetSeed {
                    id: 1,
                    owner: "bob".to_string(),
                },
            ],
        }];

        assert!(seed_registries(&catalog, &seeds).is_err());
    }

    #[test]
    fn test_seed_invalid_address() {
        let catalog = RegistryCatalog::new();
        let seeds = vec![RegistrySeed {
            address: "  ".to_string(),
            assets: Vec::new(),
        }];
        assert!(seed_registries(&catalog, &seeds).is_err());
    }
}
