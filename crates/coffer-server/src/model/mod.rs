pub mod common;
pub mod response;
