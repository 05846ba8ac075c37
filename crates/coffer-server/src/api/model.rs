//! Request and response bodies shared by the API handlers

use coffer_common::{Address, AssetId, AssetKey, CustodyError};
use coffer_custody::{CustodyRequest, LockRecord};
use serde::{Deserialize, Serialize};

/// Lock or unlock request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodyForm {
    pub caller: String,
    pub registry: String,
    pub asset_id: u64,
}

impl CustodyForm {
    pub fn into_request(self) -> Result<CustodyRequest, CustodyError> {
        Ok(CustodyRequest::new(
            self.caller.parse()?,
            self.registry.parse()?,
            AssetId(self.asset_id),
        ))
    }
}

/// Lock record together with the asset it describes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecordView {
    pub registry: Address,
    pub asset_id: AssetId,
    pub original_owner: Address,
    pub locked_at: u64,
    pub is_locked: bool,
}

impl LockRecordView {
    pub fn new(key: AssetKey, record: LockRecord) -> Self {
        Self {
            registry: key.registry,
            asset_id: key.asset_id,
            original_owner: record.original_owner,
            locked_at: record.locked_at,
            is_locked: record.is_locked,
        }
    }
}

/// Ledger settings exposed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodyConfigView {
    pub custodian: Address,
    pub holding_duration_secs: u64,
}

/// Approval request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveForm {
    pub caller: String,
    /// Empty or zero clears the approval
    #[serde(default)]
    pub approved: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerView {
    pub registry: Address,
    pub asset_id: AssetId,
    pub owner: Address,
    pub approved: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custody_form_into_request() {
        let form: CustodyForm = serde_json::from_str(
            r#"{"caller":"alice","registry":"punks","assetId":7}"#,
        )
        .unwrap();
        let request = form.into_request().unwrap();
        assert_eq!(request.caller, Address::from("alice"));
        assert_eq!(request.key(), AssetKey::new(Address::from("punks"), 7));
    }

    #[test]
    fn test_custody_form_blank_caller() {
        let form = CustodyForm {
            caller: " ".to_string(),
            registry: "punks".to_string(),
            asset_id: 1,
        };
        assert!(matches!(
            form.into_request(),
            Err(CustodyError::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_lock_record_view_serialization() {
        let key = AssetKey::new(Address::from("punks"), 3);
        let view = LockRecordView::new(key, LockRecord::locked(Address::from("alice"), 100));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["assetId"], 3);
        assert_eq!(json["originalOwner"], "alice");
        assert_eq!(json["lockedAt"], 100);
        assert_eq!(json["isLocked"], true);
    }
}
