//! Coffer Custody - NFT custody ledger
//!
//! This crate provides:
//! - The custody ledger state machine (lock, unlock, lookup)
//! - In-memory asset registry collaborators
//! - Metric descriptions for custody operations

pub mod ledger;
pub mod metrics;
pub mod registry;

// Re-export ledger types
pub use ledger::{
    CustodyLedger, CustodyRequest, CustodyStats, LedgerConfig, LockRecord, MemoryCustodyLedger,
};

// Re-export registry types
pub use registry::{MemoryAssetRegistry, RegistryCatalog};
