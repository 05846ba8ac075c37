//! Hosted registry endpoints
//!
//! Depositors need to read ownership and approve the custodian before a lock
//! can pull their asset.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};
use coffer_common::error::REGISTRY_ERROR;
use coffer_common::{Address, AssetId, AssetRegistry, CustodyError, RegistryError};
use coffer_custody::MemoryAssetRegistry;
use tracing::warn;

use super::model::{ApproveForm, OwnerView};
use crate::model::common::AppState;
use crate::model::response::{RestResult, custody_error_response};

fn registry_status(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::UnknownAsset(_) => StatusCode::NOT_FOUND,
        RegistryError::ApprovalDenied { .. } => StatusCode::FORBIDDEN,
        RegistryError::ZeroRecipient(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::CONFLICT,
    }
}

fn registry_error_response(err: &RegistryError) -> HttpResponse {
    RestResult::<()>::http_error(registry_status(err), REGISTRY_ERROR, &err.to_string())
}

fn find_registry(
    data: &AppState,
    registry: &str,
) -> Result<Arc<MemoryAssetRegistry>, CustodyError> {
    let address: Address = registry.parse()?;
    data.catalog
        .get(&address)
        .ok_or(CustodyError::InvalidCollateralTarget(address))
}

fn owner_view(
    registry: &MemoryAssetRegistry,
    asset_id: AssetId,
) -> Result<OwnerView, RegistryError> {
    Ok(OwnerView {
        registry: registry.address().clone(),
        asset_id,
        owner: registry.owner_of(asset_id)?,
        approved: registry.get_approved(asset_id)?,
    })
}

/// List hosted registry addresses
#[get("")]
pub async fn list_registries(data: web::Data<AppState>) -> impl Responder {
    RestResult::http_success(data.catalog.addresses())
}

#[get("/{registry}/assets/{asset_id}/owner")]
pub async fn owner_of(
    data: web::Data<AppState>,
    path: web::Path<(String, u64)>,
) -> impl Responder {
    let (registry, asset_id) = path.into_inner();
    let registry = match find_registry(&data, &registry) {
        Ok(registry) => registry,
        Err(e) => return custody_error_response(&e),
    };

    match owner_view(&registry, AssetId(asset_id)) {
        Ok(view) => RestResult::http_success(view),
        Err(e) => registry_error_response(&e),
    }
}

/// Grant single-asset transfer authority, typically to the custodian.
/// The custodian itself may not approve.
#[post("/{registry}/assets/{asset_id}/approve")]
pub async fn approve(
    data: web::Data<AppState>,
    path: web::Path<(String, u64)>,
    form: web::Json<ApproveForm>,
) -> impl Responder {
    let (registry, asset_id) = path.into_inner();
    let asset_id = AssetId(asset_id);
    let registry = match find_registry(&data, &registry) {
        Ok(registry) => registry,
        Err(e) => return custody_error_response(&e),
    };
    let caller: Address = match form.caller.parse() {
        Ok(caller) => caller,
        Err(e) => return custody_error_response(&e),
    };
    // The custodian holds every escrowed asset; its authority is exercised
    // only through lock and unlock
    if &caller == data.ledger.custodian() {
        let err = RegistryError::ApprovalDenied { caller, asset_id };
        warn!(registry = %registry.address(), %asset_id, "Approval rejected: {}", err);
        return registry_error_response(&err);
    }
    let approved: Address = if form.approved.trim().is_empty() {
        Address::ZERO
    } else {
        match form.approved.parse() {
            Ok(approved) => approved,
            Err(e) => return custody_error_response(&e),
        }
    };

    match registry
        .approve(&caller, &approved, asset_id)
        .and_then(|_| owner_view(&registry, asset_id))
    {
        Ok(view) => RestResult::http_success(view),
        Err(e) => {
            warn!(
                registry = %registry.address(),
                %asset_id,
                %caller,
                "Approval rejected: {}",
                e
            );
            registry_error_response(&e)
        }
    }
}
