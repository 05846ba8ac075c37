//! Collaborator traits
//!
//! The custody ledger owns no asset state of its own. Ownership and transfer
//! live in an asset registry, reached through these traits so the ledger can
//! work against any registry implementation.

use std::sync::Arc;

use crate::error::RegistryError;
use crate::identity::{Address, AssetId};

/// Asset registry capability consumed by the custody ledger
///
/// Calls are synchronous and complete within the caller's unit of work.
/// Implementations must not call back into the ledger.
pub trait AssetRegistry: Send + Sync {
    /// Address this registry is known by
    fn address(&self) -> &Address;

    /// Current holder of an asset
    fn owner_of(&self, asset_id: AssetId) -> Result<Address, RegistryError>;

    /// Move an asset from `from` to `to` on behalf of `operator`.
    ///
    /// Fails unless `from` currently holds the asset and `operator` is either
    /// `from` itself or has been granted authority over the asset by `from`.
    fn transfer_from(
        &self,
        operator: &Address,
        from: &Address,
        to: &Address,
        asset_id: AssetId,
    ) -> Result<(), RegistryError>;
}

/// Resolves a registry address to a usable collaborator
pub trait RegistryDirectory: Send + Sync {
    /// `None` when the address does not name a registry.
    fn resolve(&self, address: &Address) -> Option<Arc<dyn AssetRegistry>>;
}
