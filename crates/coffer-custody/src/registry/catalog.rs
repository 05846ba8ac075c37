//! Registry catalog
//!
//! Maps registry addresses to hosted registries. An address absent from the
//! catalog does not name a registry, which the ledger reports as an invalid
//! collateral target.

use std::sync::Arc;

use coffer_common::{Address, AssetRegistry, RegistryDirectory};
use dashmap::DashMap;
use tracing::info;

use super::memory::MemoryAssetRegistry;

#[derive(Default)]
pub struct RegistryCatalog {
    registries: DashMap<Address, Arc<MemoryAssetRegistry>>,
}

impl RegistryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host a registry under its own address, replacing any previous one
    pub fn register(&self, registry: Arc<MemoryAssetRegistry>) {
        let address = registry.address().clone();
        info!(registry = %address, "Registry registered");
        self.registries.insert(address, registry);
    }

    pub fn get(&self, address: &Address) -> Option<Arc<MemoryAssetRegistry>> {
        self.registries.get(address).map(|r| r.value().clone())
    }

    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> =
            self.registries.iter().map(|r| r.key().clone()).collect();
        addresses.sort();
        addresses
    }
}

impl RegistryDirectory for RegistryCatalog {
    fn resolve(&self, address: &Address) -> Option<Arc<dyn AssetRegistry>> {
        self.get(address).map(|registry| registry as Arc<dyn AssetRegistry>)
    }
}
