//! Authentication counters for password logins and x509 certificate
//! checks, exported through Prometheus.
//!
//! ```no_run
//! use auth_metrics::{AuthResult, Configuration, Provider, telemetry};
//!
//! let config = Configuration::default().read()?;
//! let (metrics, handle) = telemetry::setup_metrics_recorder(&config)?;
//!
//! metrics.record_basic_password_auth(AuthResult::Success);
//! metrics.x509_missing_san(Provider::GitHub).increment(1);
//!
//! println!("{}", handle.render());
//! # Ok::<(), auth_metrics::error::Error>(())
//! ```

#![forbid(unsafe_code)]
pub mod config;
pub mod error;
pub mod labels;
pub mod metrics;
pub mod registry;
pub mod telemetry;

pub use crate::config::{Configuration, LabelPolicy};
pub use crate::labels::{AuthResult, Provider};
pub use crate::metrics::{AuthMetrics, PasswordAuthKind};
pub use crate::registry::Registry;

/// Read one sample from the rendered exposition text.
/// MUST NEVER be used in production.
#[cfg(test)]
pub fn sample(
    handle: &metrics_exporter_prometheus::PrometheusHandle,
    series: &str,
) -> Option<u64> {
    handle.render().lines().find_map(|line| {
        line.strip_prefix(series)
            .and_then(|rest| rest.strip_prefix(' '))
            .and_then(|value| value.trim().parse().ok())
    })
}
