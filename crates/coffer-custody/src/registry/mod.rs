//! Asset registry collaborators
//!
//! The in-memory registry hosted by the server, and the catalog the ledger
//! resolves registry addresses through.

mod catalog;
mod memory;

pub use catalog::RegistryCatalog;
pub use memory::MemoryAssetRegistry;
