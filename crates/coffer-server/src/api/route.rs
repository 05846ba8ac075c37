//! Route configuration

use actix_web::{Scope, web};

use super::{custody, registry};
use crate::model::response::invalid_input;

/// Custody ledger routes
///
/// Routes:
/// - POST /v1/custody/lock - Pull an asset into custody
/// - POST /v1/custody/unlock - Return an asset to its depositor
/// - GET /v1/custody/locks/{registry}/{asset_id} - Read a lock record
/// - GET /v1/custody/config - Custodian address and holding duration
/// - GET /v1/custody/stats - Operation counters
pub fn custody_routes() -> Scope {
    web::scope("/v1/custody")
        .service(custody::lock)
        .service(custody::unlock)
        .service(custody::lookup)
        .service(custody::custody_config)
        .service(custody::stats)
}

/// Hosted registry routes
///
/// Routes:
/// - GET /v1/registries - List hosted registries
/// - GET /v1/registries/{registry}/assets/{asset_id}/owner - Holder and approval
/// - POST /v1/registries/{registry}/assets/{asset_id}/approve - Approve an operator
pub fn registry_routes() -> Scope {
    web::scope("/v1/registries")
        .service(registry::list_registries)
        .service(registry::owner_of)
        .service(registry::approve)
}

/// Register every API route on an app
///
/// Malformed path segments and request bodies answer 400 in the `RestResult`
/// envelope rather than actix's plain-text defaults.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| invalid_input(err)))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| invalid_input(err)))
        .service(custody_routes())
        .service(registry_routes())
        .route("/metrics", web::get().to(custody::render_metrics));
}
