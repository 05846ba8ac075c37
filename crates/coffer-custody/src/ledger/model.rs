//! Custody Ledger Data Model

use coffer_common::{Address, AssetId, AssetKey, CustodyError, DEFAULT_HOLDING_DURATION_SECS};
use serde::{Deserialize, Serialize};

/// Lock record for a single asset identity
///
/// The zero form (`LockRecord::default()`) stands for an asset that was never
/// locked. After an unlock, `original_owner` and `locked_at` remain as
/// historical residue and carry no authority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    /// Party that deposited the asset
    pub original_owner: Address,
    /// Clock seconds at which the asset entered custody
    pub locked_at: u64,
    /// True from a successful lock until the matching unlock
    pub is_locked: bool,
}

impl LockRecord {
    /// Fresh record for an asset entering custody
    pub fn locked(owner: Address, now: u64) -> Self {
        Self {
            original_owner: owner,
            locked_at: now,
            is_locked: true,
        }
    }

    /// Check if the given party deposited the currently locked asset
    pub fn is_owned_by(&self, caller: &Address) -> bool {
        self.is_locked && &self.original_owner == caller
    }

    /// Seconds spent in custody so far
    pub fn elapsed_secs(&self, now: u64) -> u64 {
        now.saturating_sub(self.locked_at)
    }

    /// Seconds left before the holding duration is satisfied
    pub fn remaining_secs(&self, now: u64, holding_duration: u64) -> u64 {
        holding_duration.saturating_sub(self.elapsed_secs(now))
    }

    /// Start a new lock cycle, overwriting any residue of the previous one
    pub fn lock(&mut self, owner: Address, now: u64) {
        *self = Self::locked(owner, now);
    }

    /// End the current lock cycle
    pub fn unlock(&mut self) {
        self.is_locked = false;
    }

    /// Validate an unlock attempt.
    ///
    /// Checks run in a fixed order: lock status, then authority, then timing.
    pub fn ensure_releasable(
        &self,
        key: &AssetKey,
        caller: &Address,
        now: u64,
        holding_duration: u64,
    ) -> Result<(), CustodyError> {
        if !self.is_locked {
            return Err(CustodyError::NotLocked(key.clone()));
        }
        if !self.is_owned_by(caller) {
            return Err(CustodyError::NotOwner {
                key: key.clone(),
                caller: caller.clone(),
            });
        }
        let remaining_secs = self.remaining_secs(now, holding_duration);
        if remaining_secs > 0 {
            return Err(CustodyError::StillLocked {
                key: key.clone(),
                remaining_secs,
            });
        }
        Ok(())
    }
}

/// Ledger configuration, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Minimum seconds an asset stays in custody
    #[serde(default = "default_holding_duration")]
    pub holding_duration_secs: u64,
}

fn default_holding_duration() -> u64 {
    DEFAULT_HOLDING_DURATION_SECS
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            holding_duration_secs: DEFAULT_HOLDING_DURATION_SECS,
        }
    }
}

/// Lock or unlock request
///
/// The caller identity is explicit; the ledger trusts whatever authenticated
/// it upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodyRequest {
    /// Party issuing the call
    pub caller: Address,
    /// Registry the asset lives in
    pub registry: Address,
    /// Asset id within that registry
    pub asset_id: AssetId,
}

impl CustodyRequest {
    pub fn new(caller: Address, registry: Address, asset_id: impl Into<AssetId>) -> Self {
        Self {
            caller,
            registry,
            asset_id: asset_id.into(),
        }
    }

    pub fn key(&self) -> AssetKey {
        AssetKey::new(self.registry.clone(), self.asset_id)
    }
}

/// Custody statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodyStats {
    /// Assets currently held in custody
    pub held: u64,
    /// Successful lock operations
    pub total_locks: u64,
    /// Successful unlock operations
    pub total_unlocks: u64,
    /// Rejected lock or unlock operations
    pub rejected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> AssetKey {
        AssetKey::new(Address::from("punks"), 1)
    }

    #[test]
    fn test_default_record_is_unlocked() {
        let record = LockRecord::default();
        assert!(!record.is_locked);
        assert!(record.original_owner.is_zero());
        assert_eq!(record.locked_at, 0);
    }

    #[test]
    fn test_record_lock_cycle() {
        let alice = Address::from("alice");
        let bob = Address::from("bob");

        let mut record = LockRecord::locked(alice.clone(), 10);
        assert!(record.is_owned_by(&alice));
        assert!(!record.is_owned_by(&bob));

        record.unlock();
        assert!(!record.is_locked);
        assert!(!record.is_owned_by(&alice));
        assert_eq!(record.original_owner, alice);

        record.lock(bob.clone(), 500);
        assert!(record.is_owned_by(&bob));
        assert_eq!(record.locked_at, 500);
    }

    #[test]
    fn test_remaining_secs() {
        let record = LockRecord::locked(Address::from("alice"), 100);
        assert_eq!(record.remaining_secs(100, 120), 120);
        assert_eq!(record.remaining_secs(200, 120), 20);
        assert_eq!(record.remaining_secs(220, 120), 0);
        assert_eq!(record.remaining_secs(1_000, 120), 0);
        // A clock reading before the lock never underflows
        assert_eq!(record.remaining_secs(50, 120), 120);
    }

    #[test]
    fn test_ensure_releasable_order() {
        let alice = Address::from("alice");
        let thief = Address::from("thief");

        let unlocked = LockRecord::default();
        assert!(matches!(
            unlocked.ensure_releasable(&key(), &alice, 1_000, 120),
            Err(CustodyError::NotLocked(_))
        ));

        let record = LockRecord::locked(alice.clone(), 0);
        // Wrong caller and too early: authority is reported first
        assert!(matches!(
            record.ensure_releasable(&key(), &thief, 10, 120),
            Err(CustodyError::NotOwner { .. })
        ));
        assert!(matches!(
            record.ensure_releasable(&key(), &alice, 100, 120),
            Err(CustodyError::StillLocked {
                remaining_secs: 20,
                ..
            })
        ));
        assert!(record.ensure_releasable(&key(), &alice, 120, 120).is_ok());
        assert!(record.ensure_releasable(&key(), &alice, 121, 120).is_ok());
    }

    #[test]
    fn test_zero_duration_releases_immediately() {
        let alice = Address::from("alice");
        let record = LockRecord::locked(alice.clone(), 42);
        assert!(record.ensure_releasable(&key(), &alice, 42, 0).is_ok());
    }

    #[test]
    fn test_ledger_config_default() {
        let config: LedgerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.holding_duration_secs, 120);
        assert_eq!(config, LedgerConfig::default());
    }
}
