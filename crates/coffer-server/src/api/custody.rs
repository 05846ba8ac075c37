//! Custody ledger endpoints

use actix_web::{HttpResponse, Responder, get, post, web};
use coffer_common::{Address, AssetId, AssetKey};

use super::model::{CustodyConfigView, CustodyForm, LockRecordView};
use crate::model::common::AppState;
use crate::model::response::{RestResult, custody_error_response};

/// Pull an asset from the caller into custody
#[post("/lock")]
pub async fn lock(data: web::Data<AppState>, form: web::Json<CustodyForm>) -> impl Responder {
    let request = match form.into_inner().into_request() {
        Ok(request) => request,
        Err(e) => return custody_error_response(&e),
    };
    let key = request.key();

    match data.ledger.lock(request).await {
        Ok(record) => RestResult::http_success(LockRecordView::new(key, record)),
        Err(e) => custody_error_response(&e),
    }
}

/// Return an asset to its depositor once the holding period has elapsed
#[post("/unlock")]
pub async fn unlock(data: web::Data<AppState>, form: web::Json<CustodyForm>) -> impl Responder {
    let request = match form.into_inner().into_request() {
        Ok(request) => request,
        Err(e) => return custody_error_response(&e),
    };
    let key = request.key();

    match data.ledger.unlock(request).await {
        Ok(record) => RestResult::http_success(LockRecordView::new(key, record)),
        Err(e) => custody_error_response(&e),
    }
}

/// Public read of a lock record. Never-locked assets report the zero form.
#[get("/locks/{registry}/{asset_id}")]
pub async fn lookup(data: web::Data<AppState>, path: web::Path<(String, u64)>) -> impl Responder {
    let (registry, asset_id) = path.into_inner();
    let registry: Address = match registry.parse() {
        Ok(registry) => registry,
        Err(e) => return custody_error_response(&e),
    };
    let key = AssetKey::new(registry, AssetId(asset_id));

    let record = data.ledger.lookup(&key).await;
    RestResult::http_success(LockRecordView::new(key, record))
}

#[get("/config")]
pub async fn custody_config(data: web::Data<AppState>) -> impl Responder {
    RestResult::http_success(CustodyConfigView {
        custodian: data.ledger.custodian().clone(),
        holding_duration_secs: data.ledger.holding_duration(),
    })
}

#[get("/stats")]
pub async fn stats(data: web::Data<AppState>) -> impl Responder {
    RestResult::http_success(data.ledger.stats().await)
}

/// Prometheus scrape endpoint
pub async fn render_metrics(data: web::Data<AppState>) -> HttpResponse {
    match data.metrics {
        Some(ref handle) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(handle.render()),
        None => HttpResponse::NotFound().finish(),
    }
}
