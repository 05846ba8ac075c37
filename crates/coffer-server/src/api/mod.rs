//! HTTP API for the custody ledger and hosted registries

pub mod custody;
pub mod model;
pub mod registry;
pub mod route;
