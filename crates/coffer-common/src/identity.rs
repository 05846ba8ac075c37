//! Party and asset identities
//!
//! An [`Address`] names any party that can hold an asset: a depositor, the
//! custodian itself, or a registry. An [`AssetKey`] pairs a registry address
//! with a per-registry [`AssetId`], so two registries may reuse the same
//! numeric id without colliding.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CustodyError;

/// Opaque identity of a party or registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// The empty identity, carried by records that were never locked
    pub const ZERO: Address = Address(String::new());

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = CustodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CustodyError::IllegalArgument(
                "address must not be empty".to_string(),
            ));
        }
        if trimmed.contains("::") {
            return Err(CustodyError::IllegalArgument(format!(
                "address '{}' must not contain '::'",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Per-registry asset identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub u64);

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetId {
    type Err = CustodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| CustodyError::IllegalArgument(format!("asset id '{}': {}", s, e)))
    }
}

impl From<u64> for AssetId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Composite key naming one asset across all registries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetKey {
    pub registry: Address,
    pub asset_id: AssetId,
}

impl AssetKey {
    pub fn new(registry: Address, asset_id: impl Into<AssetId>) -> Self {
        Self {
            registry,
            asset_id: asset_id.into(),
        }
    }
}

impl Display for AssetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.registry, self.asset_id)
    }
}
