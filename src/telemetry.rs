//! Telemetry logic.
//! Wire authentication metrics to a Prometheus recorder.
use std::sync::Arc;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::Configuration;
use crate::error::Result;
use crate::metrics::AuthMetrics;
use crate::registry::Registry;

/// Create recorder for Prometheus metrics and register authentication
/// counters on it.
///
/// The returned handle renders the exposition text for whatever serves the
/// scrape endpoint. Registration errors must abort startup.
pub fn setup_metrics_recorder(
    config: &Configuration,
) -> Result<(Arc<AuthMetrics>, PrometheusHandle)> {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    let registry = Registry::new(recorder);
    let metrics = AuthMetrics::register(&registry, config)?;

    Ok((Arc::new(metrics), handle))
}
