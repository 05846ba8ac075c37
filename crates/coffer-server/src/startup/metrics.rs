// Prometheus recorder installation

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::warn;

/// Install the global Prometheus recorder and describe custody metrics.
///
/// Returns `None` if a recorder is already installed, in which case metrics
/// keep flowing to that recorder and `/metrics` reports nothing.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            coffer_custody::metrics::describe_metrics();
            Some(handle)
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}
