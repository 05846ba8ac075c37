//! Custody Ledger Service Implementation
//!
//! Provides:
//! - Lock: pull an asset into custody and record the depositor
//! - Unlock: return an asset to its depositor once the holding period elapsed
//! - Lookup: public read of a lock record

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use coffer_common::{
    Address, AssetKey, AssetRegistry, Clock, CustodyError, RegistryDirectory, SystemClock,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use metrics::{counter, gauge};
use tracing::{debug, info, warn};

use super::model::*;
use crate::metrics::{
    CUSTODY_ASSETS_HELD, CUSTODY_LOCK_TOTAL, CUSTODY_REJECTED_TOTAL, CUSTODY_UNLOCK_TOTAL,
};

/// Custody Ledger service trait
#[async_trait]
pub trait CustodyLedger: Send + Sync {
    /// Pull an asset from the caller into custody
    async fn lock(&self, request: CustodyRequest) -> coffer_common::Result<LockRecord>;

    /// Return an asset to its depositor
    async fn unlock(&self, request: CustodyRequest) -> coffer_common::Result<LockRecord>;

    /// Get the lock record for an asset (zero form when never locked)
    async fn lookup(&self, key: &AssetKey) -> LockRecord;

    /// Address the ledger holds escrowed assets under
    fn custodian(&self) -> &Address;

    /// Configured holding duration in seconds
    fn holding_duration(&self) -> u64;

    /// Get custody statistics
    async fn stats(&self) -> CustodyStats;
}

/// In-memory custody ledger
///
/// Each key's read-check-transfer-write sequence runs under that key's map
/// entry guard, which is the write lock of the key's shard. Operations on one
/// asset are serialized, and so are operations on unrelated assets that hash
/// to the same shard, including while a registry transfer is in flight.
pub struct MemoryCustodyLedger {
    custodian: Address,
    config: LedgerConfig,
    /// Lock storage
    records: DashMap<AssetKey, LockRecord>,
    directory: Arc<dyn RegistryDirectory>,
    clock: Arc<dyn Clock>,
    /// Statistics
    stats: CustodyStatsCollector,
}

#[derive(Default)]
struct CustodyStatsCollector {
    total_locks: AtomicU64,
    total_unlocks: AtomicU64,
    rejected: AtomicU64,
}

impl MemoryCustodyLedger {
    pub fn new(
        custodian: Address,
        directory: Arc<dyn RegistryDirectory>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            custodian,
            config,
            records: DashMap::new(),
            directory,
            clock: Arc::new(SystemClock),
            stats: CustodyStatsCollector::default(),
        }
    }

    /// Replace the time source
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self { clock, ..self }
    }

    fn resolve(&self, key: &AssetKey) -> coffer_common::Result<Arc<dyn AssetRegistry>> {
        self.directory
            .resolve(&key.registry)
            .ok_or_else(|| CustodyError::InvalidCollateralTarget(key.registry.clone()))
    }

    fn validate_caller(&self, caller: &Address) -> coffer_common::Result<()> {
        if caller.is_zero() {
            return Err(CustodyError::IllegalArgument(
                "caller must not be the zero address".to_string(),
            ));
        }
        if caller == &self.custodian {
            return Err(CustodyError::IllegalArgument(
                "the custodian cannot act as a depositor".to_string(),
            ));
        }
        Ok(())
    }

    /// Move the asset from the depositor into custody
    fn pull(
        &self,
        registry: &dyn AssetRegistry,
        from: &Address,
        key: &AssetKey,
    ) -> coffer_common::Result<()> {
        registry
            .transfer_from(&self.custodian, from, &self.custodian, key.asset_id)
            .map_err(|e| CustodyError::transfer_rejected(key, e))
    }

    fn try_lock(&self, caller: &Address, key: &AssetKey) -> coffer_common::Result<LockRecord> {
        self.validate_caller(caller)?;
        let registry = self.resolve(key)?;

        match self.records.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_locked {
                    return Err(CustodyError::TransferRejected {
                        key: key.clone(),
                        reason: "asset is already held in custody".to_string(),
                    });
                }
                self.pull(registry.as_ref(), caller, key)?;
                let now = self.clock.now_secs();
                occupied.get_mut().lock(caller.clone(), now);
                Ok(occupied.get().clone())
            }
            Entry::Vacant(vacant) => {
                self.pull(registry.as_ref(), caller, key)?;
                let record = LockRecord::locked(caller.clone(), self.clock.now_secs());
                vacant.insert(record.clone());
                Ok(record)
            }
        }
    }

    fn try_unlock(&self, caller: &Address, key: &AssetKey) -> coffer_common::Result<LockRecord> {
        let mut record = self
            .records
            .get_mut(key)
            .ok_or_else(|| CustodyError::NotLocked(key.clone()))?;

        let now = self.clock.now_secs();
        record.ensure_releasable(key, caller, now, self.config.holding_duration_secs)?;

        let registry = self.resolve(key)?;
        registry
            .transfer_from(
                &self.custodian,
                &self.custodian,
                &record.original_owner,
                key.asset_id,
            )
            .map_err(|e| CustodyError::transfer_rejected(key, e))?;

        record.unlock();
        Ok(record.clone())
    }

    fn reject(
        &self,
        operation: &'static str,
        caller: &Address,
        key: &AssetKey,
        err: &CustodyError,
    ) {
        self.stats.rejected.fetch_add(1, Ordering::Relaxed);
        counter!(CUSTODY_REJECTED_TOTAL, "operation" => operation, "reason" => err.reason())
            .increment(1);
        warn!(
            operation,
            %caller,
            %key,
            code = err.error_code().code,
            "Custody {} rejected: {}",
            operation,
            err
        );
    }
}

#[async_trait]
impl CustodyLedger for MemoryCustodyLedger {
    async fn lock(&self, request: CustodyRequest) -> coffer_common::Result<LockRecord> {
        let key = request.key();

        match self.try_lock(&request.caller, &key) {
            Ok(record) => {
                self.stats.total_locks.fetch_add(1, Ordering::Relaxed);
                counter!(CUSTODY_LOCK_TOTAL).increment(1);
                gauge!(CUSTODY_ASSETS_HELD).increment(1.0);
                info!(
                    caller = %request.caller,
                    %key,
                    locked_at = record.locked_at,
                    "Asset locked into custody"
                );
                Ok(record)
            }
            Err(e) => {
                self.reject("lock", &request.caller, &key, &e);
                Err(e)
            }
        }
    }

    async fn unlock(&self, request: CustodyRequest) -> coffer_common::Result<LockRecord> {
        let key = request.key();

        match self.try_unlock(&request.caller, &key) {
            Ok(record) => {
                self.stats.total_unlocks.fetch_add(1, Ordering::Relaxed);
                counter!(CUSTODY_UNLOCK_TOTAL).increment(1);
                gauge!(CUSTODY_ASSETS_HELD).decrement(1.0);
                info!(
                    caller = %request.caller,
                    %key,
                    "Asset returned to original owner"
                );
                Ok(record)
            }
            Err(e) => {
                self.reject("unlock", &request.caller, &key, &e);
                Err(e)
            }
        }
    }

    async fn lookup(&self, key: &AssetKey) -> LockRecord {
        let record = self
            .records
            .get(key)
            .map(|r| r.clone())
            .unwrap_or_default();
        debug!(%key, is_locked = record.is_locked, "Lock record lookup");
        record
    }

    fn custodian(&self) -> &Address {
        &self.custodian
    }

    fn holding_duration(&self) -> u64 {
        self.config.holding_duration_secs
    }

    async fn stats(&self) -> CustodyStats {
        let held = self.records.iter().filter(|r| r.is_locked).count() as u64;

        CustodyStats {
            held,
            total_locks: self.stats.total_locks.load(Ordering::Relaxed),
            total_unlocks: self.stats.total_unlocks.load(Ordering::Relaxed),
            rejected: self.stats.rejected.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MemoryAssetRegistry, RegistryCatalog};
    use coffer_common::{AssetId, ManualClock};

    const DURATION: u64 = 120;

    struct Fixture {
        ledger: MemoryCustodyLedger,
        registry: Arc<MemoryAssetRegistry>,
        clock: Arc<ManualClock>,
        alice: Address,
        thief: Address,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(MemoryAssetRegistry::new(Address::from("mock-nft")));
        let catalog = Arc::new(RegistryCatalog::new());
        catalog.register(registry.clone());

        let clock = Arc::new(ManualClock::new(1_000));
        let ledger = MemoryCustodyLedger::new(
            Address::from("coffer"),
            catalog,
            LedgerConfig {
                holding_duration_secs: DURATION,
            },
        )
        .with_clock(clock.clone());

        Fixture {
            ledger,
            registry,
            clock,
            alice: Address::from("alice"),
            thief: Address::from("thief"),
        }
    }

    fn request(caller: &Address, id: u64) -> CustodyRequest {
        CustodyRequest::new(caller.clone(), Address::from("mock-nft"), id)
    }

    /// Mint to alice and approve the custodian, as a depositor would
    fn mint_and_approve(f: &Fixture, id: u64) {
        f.registry.mint(&f.alice, AssetId(id)).unwrap();
        f.registry
            .approve(&f.alice, &Address::from("coffer"), AssetId(id))
            .unwrap();
    }

    #[tokio::test]
    async fn test_holding_duration() {
        let f = fixture();
        assert_eq!(f.ledger.holding_duration(), 120);
        assert_eq!(f.ledger.custodian(), &Address::from("coffer"));
    }

    #[tokio::test]
    async fn test_lock_without_approval_is_rejected() {
        let f = fixture();
        f.registry.mint(&f.alice, AssetId(1)).unwrap();

        let err = f.ledger.lock(request(&f.alice, 1)).await.unwrap_err();
        assert!(matches!(err, CustodyError::TransferRejected { .. }));

        assert_eq!(f.registry.owner_of(AssetId(1)).unwrap(), f.alice);
        let key = request(&f.alice, 1).key();
        assert_eq!(f.ledger.lookup(&key).await, LockRecord::default());
        assert_eq!(f.ledger.stats().await.rejected, 1);
    }

    #[tokio::test]
    async fn test_lock_moves_asset_into_custody() {
        let f = fixture();
        mint_and_approve(&f, 1);

        let record = f.ledger.lock(request(&f.alice, 1)).await.unwrap();
        assert!(record.is_locked);
        assert_eq!(record.original_owner, f.alice);
        assert_eq!(record.locked_at, 1_000);

        assert_eq!(
            f.registry.owner_of(AssetId(1)).unwrap(),
            Address::from("coffer")
        );
        let looked_up = f.ledger.lookup(&request(&f.alice, 1).key()).await;
        assert_eq!(looked_up, record);
    }

    #[tokio::test]
    async fn test_lock_unknown_registry() {
        let f = fixture();
        let req = CustodyRequest::new(f.alice.clone(), f.alice.clone(), 1);

        let err = f.ledger.lock(req).await.unwrap_err();
        assert_eq!(err, CustodyError::InvalidCollateralTarget(f.alice.clone()));
    }

    #[tokio::test]
    async fn test_unlock_too_early() {
        let f = fixture();
        mint_and_approve(&f, 1);
        f.ledger.lock(request(&f.alice, 1)).await.unwrap();

        f.clock.advance(100);
        let err = f.ledger.unlock(request(&f.alice, 1)).await.unwrap_err();
        assert!(matches!(
            err,
            CustodyError::StillLocked {
                remaining_secs: 20,
                ..
            }
        ));
        assert_eq!(
            f.registry.owner_of(AssetId(1)).unwrap(),
            Address::from("coffer")
        );
    }

    #[tokio::test]
    async fn test_unlock_after_duration() {
        let f = fixture();
        mint_and_approve(&f, 1);
        f.ledger.lock(request(&f.alice, 1)).await.unwrap();

        f.clock.advance(121);
        let record = f.ledger.unlock(request(&f.alice, 1)).await.unwrap();
        assert!(!record.is_locked);

        assert_eq!(f.registry.owner_of(AssetId(1)).unwrap(), f.alice);
        assert!(!f.ledger.lookup(&request(&f.alice, 1).key()).await.is_locked);
    }

    #[tokio::test]
    async fn test_unlock_by_another_user() {
        let f = fixture();
        mint_and_approve(&f, 1);
        let before = f.ledger.lock(request(&f.alice, 1)).await.unwrap();

        f.clock.advance(121);
        let err = f.ledger.unlock(request(&f.thief, 1)).await.unwrap_err();
        assert!(matches!(err, CustodyError::NotOwner { .. }));
        assert_eq!(f.ledger.lookup(&request(&f.alice, 1).key()).await, before);
    }

    #[tokio::test]
    async fn test_unlock_never_locked() {
        let f = fixture();
        let err = f.ledger.unlock(request(&f.alice, 9)).await.unwrap_err();
        assert!(matches!(err, CustodyError::NotLocked(_)));
    }

    #[tokio::test]
    async fn test_double_unlock() {
        let f = fixture();
        mint_and_approve(&f, 1);
        f.ledger.lock(request(&f.alice, 1)).await.unwrap();
        f.clock.advance(DURATION);
        f.ledger.unlock(request(&f.alice, 1)).await.unwrap();

        let err = f.ledger.unlock(request(&f.alice, 1)).await.unwrap_err();
        assert!(matches!(err, CustodyError::NotLocked(_)));
    }

    #[tokio::test]
    async fn test_lock_while_locked() {
        let f = fixture();
        mint_and_approve(&f, 1);
        let first = f.ledger.lock(request(&f.alice, 1)).await.unwrap();

        let err = f.ledger.lock(request(&f.thief, 1)).await.unwrap_err();
        assert!(matches!(err, CustodyError::TransferRejected { .. }));
        assert_eq!(f.ledger.lookup(&request(&f.alice, 1).key()).await, first);
    }

    #[tokio::test]
    async fn test_custodian_cannot_deposit() {
        let f = fixture();
        let err = f
            .ledger
            .lock(request(&Address::from("coffer"), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CustodyError::IllegalArgument(_)));
    }

    #[tokio::test]
    async fn test_relock_overwrites_record() {
        let f = fixture();
        mint_and_approve(&f, 1);
        f.ledger.lock(request(&f.alice, 1)).await.unwrap();
        f.clock.advance(DURATION);
        f.ledger.unlock(request(&f.alice, 1)).await.unwrap();

        // Alice sells the asset to bob, who deposits it again
        let bob = Address::from("bob");
        f.registry
            .transfer_from(&f.alice, &f.alice, &bob, AssetId(1))
            .unwrap();
        f.registry
            .approve(&bob, &Address::from("coffer"), AssetId(1))
            .unwrap();

        f.clock.advance(5);
        let record = f.ledger.lock(request(&bob, 1)).await.unwrap();
        assert_eq!(record.original_owner, bob);
        assert_eq!(record.locked_at, 1_000 + DURATION + 5);

        let err = f.ledger.unlock(request(&f.alice, 1)).await.unwrap_err();
        assert!(matches!(err, CustodyError::NotOwner { .. }));
    }

    #[tokio::test]
    async fn test_stats() {
        let f = fixture();
        for id in 0..3 {
            mint_and_approve(&f, id);
            f.ledger.lock(request(&f.alice, id)).await.unwrap();
        }
        f.clock.advance(DURATION);
        f.ledger.unlock(request(&f.alice, 0)).await.unwrap();
        let _ = f.ledger.unlock(request(&f.thief, 1)).await;

        let stats = f.ledger.stats().await;
        assert_eq!(stats.held, 2);
        assert_eq!(stats.total_locks, 3);
        assert_eq!(stats.total_unlocks, 1);
        assert_eq!(stats.rejected, 1);
    }
}
