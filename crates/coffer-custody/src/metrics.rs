// Metric names and descriptions for the custody ledger

use metrics::{describe_counter, describe_gauge};

pub const CUSTODY_LOCK_TOTAL: &str = "custody_lock_total";
pub const CUSTODY_UNLOCK_TOTAL: &str = "custody_unlock_total";
pub const CUSTODY_REJECTED_TOTAL: &str = "custody_rejected_total";
pub const CUSTODY_ASSETS_HELD: &str = "custody_assets_held";

/// Register metric descriptions with the installed recorder
/// Should be called once at application startup
pub fn describe_metrics() {
    describe_counter!(
        CUSTODY_LOCK_TOTAL,
        "Total number of assets locked into custody"
    );
    describe_counter!(
        CUSTODY_UNLOCK_TOTAL,
        "Total number of assets returned to their depositor"
    );
    describe_counter!(
        CUSTODY_REJECTED_TOTAL,
        "Total number of rejected lock and unlock operations"
    );
    describe_gauge!(CUSTODY_ASSETS_HELD, "Assets currently held in custody");
}
