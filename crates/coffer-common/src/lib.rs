//! Coffer Common - Shared types, traits, and errors
//!
//! This crate provides the foundational types used across all Coffer components:
//! - Party and asset identities
//! - Error taxonomy and error codes
//! - Collaborator traits for the asset registry
//! - Injectable time source

pub mod error;
pub mod identity;
pub mod time;
pub mod traits;

// Re-exports for convenience
pub use error::{CustodyError, ErrorCode, RegistryError};
pub use identity::{Address, AssetId, AssetKey};
pub use time::{Clock, ManualClock, SystemClock};
pub use traits::{AssetRegistry, RegistryDirectory};

/// Default custodian address used when none is configured
pub const DEFAULT_CUSTODIAN: &str = "coffer";

/// Default holding duration in seconds
pub const DEFAULT_HOLDING_DURATION_SECS: u64 = 120;

/// Result alias for custody operations
pub type Result<T> = std::result::Result<T, CustodyError>;
