//! Error types and error codes for Coffer
//!
//! This module defines:
//! - `CustodyError`: failures surfaced by the custody ledger
//! - `RegistryError`: failures reported by an asset registry collaborator
//! - `ErrorCode`: structured error codes for API responses

use serde::{Deserialize, Serialize};

use crate::identity::{Address, AssetId, AssetKey};

/// Custody ledger error types
///
/// Every variant aborts the whole operation; no partial state is retained.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("Address is not a contract: {0}")]
    InvalidCollateralTarget(Address),

    #[error("transfer of {key} rejected: {reason}")]
    TransferRejected { key: AssetKey, reason: String },

    #[error("Not the owner: {caller} cannot unlock {key}")]
    NotOwner { key: AssetKey, caller: Address },

    #[error("Still locked. Wait for some time to pass. ({remaining_secs}s remaining for {key})")]
    StillLocked { key: AssetKey, remaining_secs: u64 },

    #[error("Not locked: {0}")]
    NotLocked(AssetKey),
}

impl CustodyError {
    /// Wrap a registry failure as a rejected transfer for the given asset
    pub fn transfer_rejected(key: &AssetKey, source: RegistryError) -> Self {
        Self::TransferRejected {
            key: key.clone(),
            reason: source.to_string(),
        }
    }

    pub fn error_code(&self) -> ErrorCode<'static> {
        match self {
            Self::IllegalArgument(_) => ILLEGAL_ARGUMENT,
            Self::InvalidCollateralTarget(_) => INVALID_COLLATERAL_TARGET,
            Self::TransferRejected { .. } => TRANSFER_REJECTED,
            Self::NotOwner { .. } => NOT_OWNER,
            Self::StillLocked { .. } => STILL_LOCKED,
            Self::NotLocked(_) => NOT_LOCKED,
        }
    }

    /// Short label used for metrics and structured logs
    pub fn reason(&self) -> &'static str {
        match self {
            Self::IllegalArgument(_) => "illegal_argument",
            Self::InvalidCollateralTarget(_) => "invalid_collateral_target",
            Self::TransferRejected { .. } => "transfer_rejected",
            Self::NotOwner { .. } => "not_owner",
            Self::StillLocked { .. } => "still_locked",
            Self::NotLocked(_) => "not_locked",
        }
    }

    /// Only a premature unlock can succeed later without the caller changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StillLocked { .. })
    }
}

/// Asset registry error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("asset {0} does not exist")]
    UnknownAsset(AssetId),

    #[error("asset {0} already exists")]
    AssetExists(AssetId),

    #[error("asset {asset_id} is held by {holder}, not {from}")]
    NotHolder {
        asset_id: AssetId,
        holder: Address,
        from: Address,
    },

    #[error("{operator} is not approved to move asset {asset_id}")]
    NotApproved { operator: Address, asset_id: AssetId },

    #[error("{caller} is not allowed to approve asset {asset_id}")]
    ApprovalDenied { caller: Address, asset_id: AssetId },

    #[error("cannot transfer asset {0} to the zero address")]
    ZeroRecipient(AssetId),
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const ILLEGAL_ARGUMENT: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "illegal argument",
};

// Custody errors
pub const INVALID_COLLATERAL_TARGET: ErrorCode<'static> = ErrorCode {
    code: 30001,
    message: "Address is not a contract",
};

pub const TRANSFER_REJECTED: ErrorCode<'static> = ErrorCode {
    code: 30002,
    message: "transfer rejected by registry",
};

pub const NOT_OWNER: ErrorCode<'static> = ErrorCode {
    code: 30003,
    message: "Not the owner",
};

pub const STILL_LOCKED: ErrorCode<'static> = ErrorCode {
    code: 30004,
    message: "Still locked. Wait for some time to pass.",
};

pub const NOT_LOCKED: ErrorCode<'static> = ErrorCode {
    code: 30005,
    message: "Not locked",
};

// Registry errors surfaced through the registry API
pub const REGISTRY_ERROR: ErrorCode<'static> = ErrorCode {
    code: 31001,
    message: "registry error",
};
