//! Server startup wiring: logging and metrics

pub mod logging;
pub mod metrics;

pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
pub use metrics::init_metrics;
