//! In-memory asset registry
//!
//! Follows the usual non-fungible token rules: one holder per asset, a single
//! per-asset approved address that is cleared on every transfer, and
//! holder-wide operators.

use std::collections::{HashMap, HashSet};

use coffer_common::{Address, AssetId, AssetRegistry, RegistryError};
use parking_lot::RwLock;
use tracing::debug;

#[derive(Default)]
struct RegistryState {
    owners: HashMap<AssetId, Address>,
    approvals: HashMap<AssetId, Address>,
    /// (holder, operator) pairs
    operators: HashSet<(Address, Address)>,
}

impl RegistryState {
    fn owner(&self, asset_id: AssetId) -> Result<&Address, RegistryError> {
        self.owners
            .get(&asset_id)
            .ok_or(RegistryError::UnknownAsset(asset_id))
    }

    fn is_operator(&self, holder: &Address, operator: &Address) -> bool {
        self.operators.contains(&(holder.clone(), operator.clone()))
    }
}

pub struct MemoryAssetRegistry {
    address: Address,
    state: RwLock<RegistryState>,
}

impl MemoryAssetRegistry {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Create an asset held by `to`
    pub fn mint(&self, to: &Address, asset_id: AssetId) -> Result<(), RegistryError> {
        if to.is_zero() {
            return Err(RegistryError::ZeroRecipient(asset_id));
        }
        let mut state = self.state.write();
        if state.owners.contains_key(&asset_id) {
            return Err(RegistryError::AssetExists(asset_id));
        }
        state.owners.insert(asset_id, to.clone());
        debug!(registry = %self.address, %asset_id, owner = %to, "Asset minted");
        Ok(())
    }

    /// Grant `approved` authority to move one asset. The zero address clears it.
    pub fn approve(
        &self,
        caller: &Address,
        approved: &Address,
        asset_id: AssetId,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.write();
        let holder = state.owner(asset_id)?.clone();
        if caller != &holder && !state.is_operator(&holder, caller) {
            return Err(RegistryError::ApprovalDenied {
                caller: caller.clone(),
                asset_id,
            });
        }

        if approved.is_zero() {
            state.approvals.remove(&asset_id);
        } else {
            state.approvals.insert(asset_id, approved.clone());
        }
        debug!(registry = %self.address, %asset_id, %approved, "Asset approval updated");
        Ok(())
    }

    /// Grant or revoke `operator` authority over every asset `holder` owns
    pub fn set_approval_for_all(&self, holder: &Address, operator: &Address, approved: bool) {
        let mut state = self.state.write();
        let pair = (holder.clone(), operator.clone());
        if approved {
            state.operators.insert(pair);
        } else {
            state.operators.remove(&pair);
        }
    }

    pub fn get_approved(&self, asset_id: AssetId) -> Result<Option<Address>, RegistryError> {
        let state = self.state.read();
        state.owner(asset_id)?;
        Ok(state.approvals.get(&asset_id).cloned())
    }

    pub fn balance_of(&self, holder: &Address) -> usize {
        self.state
            .read()
            .owners
            .values()
            .filter(|owner| *owner == holder)
            .count()
    }
}

impl AssetRegistry for MemoryAssetRegistry {
    fn address(&self) -> &Address {
        &self.address
    }

    fn owner_of(&self, asset_id: AssetId) -> Result<Address, RegistryError> {
        self.state.read().owner(asset_id).cloned()
    }

    fn transfer_from(
        &self,
        operator: &Address,
        from: &Address,
        to: &Address,
        asset_id: AssetId,
    ) -> Result<(), RegistryError> {
        if to.is_zero() {
            return Err(RegistryError::ZeroRecipient(asset_id));
        }

        let mut state = self.state.write();
        let holder = state.owner(asset_id)?;
        if holder != from {
            return Err(RegistryError::NotHolder {
                asset_id,
                holder: holder.clone(),
                from: from.clone(),
            });
        }

        let authorized = operator == from
            || state.approvals.get(&asset_id) == Some(operator)
            || state.is_operator(from, operator);
        if !authorized {
            return Err(RegistryError::NotApproved {
                operator: operator.clone(),
                asset_id,
            });
        }

        state.approvals.remove(&asset_id);
        state.owners.insert(asset_id, to.clone());
        debug!(
            registry = %self.address,
            %asset_id,
            %from,
            %to,
            "Asset transferred"
        );
        Ok(())
    }
}
