//! Password and x509 authentication counters.

use metrics::Counter;

use crate::config::{Configuration, LabelPolicy};
use crate::error::Result;
use crate::labels::{AuthResult, Provider};
use crate::registry::{CounterVec, Opts, Registry};

const RESULT_LABEL: &str = "result";
const PROVIDER_LABEL: &str = "provider";

const X509_MISSING_SAN_HELP: &str = "Counts the number of requests to servers missing SAN extension \
     in their serving certificate OR the number of connection failures \
     due to the lack of x509 certificate SAN extension missing \
     (either/or, based on the runtime environment)";

/// Way the password was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordAuthKind {
    /// `Authorization: Basic` header.
    Basic,
    /// Login form.
    Form,
}

/// Authentication counters, registered once and shared between handlers.
pub struct AuthMetrics {
    subsystem: String,
    policy: LabelPolicy,
    password_total: Counter,
    form_counter: Counter,
    form_counter_result: CounterVec,
    basic_counter: Counter,
    basic_counter_result: CounterVec,
    x509_missing_san: CounterVec,
}

impl AuthMetrics {
    /// Register every authentication counter on `registry`.
    ///
    /// Result and provider series are created at zero so that a scrape
    /// made before any authentication still lists them.
    pub fn register(registry: &Registry, config: &Configuration) -> Result<Self> {
        let subsystem = config.subsystem.as_str();

        let password_total = registry.must_register_counter(&Opts::new(
            subsystem,
            "password_total",
            "Counts total password authentication attempts",
        ))?;
        let form_counter = registry.must_register_counter(&Opts::new(
            subsystem,
            "form_password_count",
            "Counts form password authentication attempts",
        ))?;
        let form_counter_result = registry.must_register_counter_vec(
            &Opts::new(
                subsystem,
                "form_password_count_result",
                "Counts form password authentication attempts by result",
            ),
            RESULT_LABEL,
        )?;
        let basic_counter = registry.must_register_counter(&Opts::new(
            subsystem,
            "basic_password_count",
            "Counts basic password authentication attempts",
        ))?;
        let basic_counter_result = registry.must_register_counter_vec(
            &Opts::new(
                subsystem,
                "basic_password_count_result",
                "Counts basic password authentication attempts by result",
            ),
            RESULT_LABEL,
        )?;
        let x509_missing_san = registry.must_register_counter_vec(
            &Opts::new(subsystem, "x509_missing_san_total", X509_MISSING_SAN_HELP),
            PROVIDER_LABEL,
        )?;

        for result in AuthResult::ALL {
            basic_counter_result.touch(result.as_str());
            form_counter_result.touch(result.as_str());
        }

        let metrics = Self {
            subsystem: config.subsystem.clone(),
            policy: config.result_labels,
            password_total,
            form_counter,
            form_counter_result,
            basic_counter,
            basic_counter_result,
            x509_missing_san,
        };

        for provider in Provider::ALL {
            metrics.x509_missing_san.touch(provider.as_str());
        }

        tracing::info!(subsystem = %metrics.subsystem, policy = ?metrics.policy, "authentication metrics registered");
        Ok(metrics)
    }

    /// Prefix every metric was registered with.
    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    /// Record a password submitted through the `Authorization` header.
    pub fn record_basic_password_auth(&self, result: impl AsRef<str>) {
        self.record_password_auth(PasswordAuthKind::Basic, result.as_ref());
    }

    /// Record a password submitted through the login form.
    pub fn record_form_password_auth(&self, result: impl AsRef<str>) {
        self.record_password_auth(PasswordAuthKind::Form, result.as_ref());
    }

    /// Increment the total, per-kind and per-result counters.
    pub fn record_password_auth(&self, kind: PasswordAuthKind, result: &str) {
        let result = self.result_label(result);

        self.password_total.increment(1);
        match kind {
            PasswordAuthKind::Basic => {
                self.basic_counter.increment(1);
                self.basic_counter_result.with_label_values(result).increment(1);
            },
            PasswordAuthKind::Form => {
                self.form_counter.increment(1);
                self.form_counter_result.with_label_values(result).increment(1);
            },
        }
    }

    /// Counter of certificates without SAN extension seen for `provider`.
    /// The caller decides when to increment it.
    pub fn x509_missing_san(&self, provider: Provider) -> Counter {
        self.x509_missing_san.with_label_values(provider.as_str())
    }

    fn result_label<'a>(&self, result: &'a str) -> &'a str {
        match self.policy {
            LabelPolicy::Open => result,
            LabelPolicy::Strict => match result.parse::<AuthResult>() {
                Ok(result) => result.as_str(),
                Err(_) => {
                    tracing::warn!(result, "unknown authentication result, recorded as `error`");
                    AuthResult::Error.as_str()
                },
            },
        }
    }
}
