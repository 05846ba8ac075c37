//! HTTP response types for Coffer server

use std::fmt::{Debug, Display};

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{Error, HttpResponse};
use coffer_common::CustodyError;
use coffer_common::error::{ErrorCode, SUCCESS};
use serde::{Deserialize, Serialize};

/// REST API result type with convenient builder methods
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestResult<T> {
    pub code: i32,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> RestResult<T> {
    /// Create a successful result with data
    pub fn ok(data: Option<T>) -> Self {
        RestResult {
            code: SUCCESS.code,
            message: Some(SUCCESS.message.to_string()),
            data,
        }
    }

    /// Create an error result
    pub fn err(code: i32, message: &str) -> Self {
        RestResult {
            code,
            message: Some(message.to_string()),
            data: None,
        }
    }
}

impl<T: Serialize> RestResult<T> {
    pub fn http_success(data: T) -> HttpResponse {
        HttpResponse::Ok().json(RestResult::ok(Some(data)))
    }
}

impl RestResult<()> {
    pub fn http_error(status: StatusCode, code: ErrorCode<'_>, message: &str) -> HttpResponse {
        HttpResponse::build(status).json(RestResult::<()>::err(code.code, message))
    }
}

/// HTTP status for a custody failure
///
/// `StillLocked` maps to 423 so clients can tell "wait and retry" apart from
/// permanent rejections without parsing the body.
pub fn custody_status(err: &CustodyError) -> StatusCode {
    match err {
        CustodyError::IllegalArgument(_) => StatusCode::BAD_REQUEST,
        CustodyError::InvalidCollateralTarget(_) => StatusCode::NOT_FOUND,
        CustodyError::TransferRejected { .. } => StatusCode::CONFLICT,
        CustodyError::NotOwner { .. } => StatusCode::FORBIDDEN,
        CustodyError::StillLocked { .. } => StatusCode::LOCKED,
        CustodyError::NotLocked(_) => StatusCode::CONFLICT,
    }
}

pub fn custody_error_response(err: &CustodyError) -> HttpResponse {
    RestResult::<()>::http_error(custody_status(err), err.error_code(), &err.to_string())
}

/// Wrap a path or body extraction failure in the `IllegalArgument` envelope
pub fn invalid_input<E>(err: E) -> Error
where
    E: Debug + Display + 'static,
{
    let response = custody_error_response(&CustodyError::IllegalArgument(err.to_string()));
    InternalError::from_response(err, response).into()
}
