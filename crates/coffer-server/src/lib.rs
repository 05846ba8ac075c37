//! Coffer Server - HTTP front end for the NFT custody ledger
//!
//! Wires configuration, logging, metrics and the actix-web API around the
//! in-memory custody ledger from `coffer-custody`.

pub mod api;
pub mod config;
pub mod model;
pub mod startup;
