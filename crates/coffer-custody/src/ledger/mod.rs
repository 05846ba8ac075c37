//! Custody Ledger
//!
//! This module provides:
//! - Lock record data model
//! - Lock / unlock / lookup service
//! - Custody statistics

mod model;
mod service;

pub use model::*;
pub use service::*;
