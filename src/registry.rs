//! Explicit metrics registry on top of a [`metrics::Recorder`].
//!
//! Counters are registered once, by name, and any duplicate or malformed
//! definition is refused. Counter vectors hand out one [`Counter`] per label
//! value, created the first time the value is seen.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use metrics::{Counter, Key, KeyName, Label, Level, Metadata, Recorder};
use regex_lite::Regex;

use crate::error::{Error, Result};

static METRIC_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_:][a-zA-Z0-9_:]*$").expect("metric name regex is valid")
});
static LABEL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("label name regex is valid")
});

/// Check `name` against the Prometheus metric name grammar.
pub fn is_valid_metric_name(name: &str) -> bool {
    METRIC_NAME.is_match(name)
}

fn is_valid_label_name(name: &str) -> bool {
    LABEL_NAME.is_match(name) && !name.starts_with("__")
}

fn metadata() -> Metadata<'static> {
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()))
}

/// Definition of a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opts<'a> {
    pub subsystem: &'a str,
    pub name: &'a str,
    pub help: &'a str,
}

impl<'a> Opts<'a> {
    pub fn new(subsystem: &'a str, name: &'a str, help: &'a str) -> Self {
        Self {
            subsystem,
            name,
            help,
        }
    }

    /// Fully qualified name, `subsystem_name`.
    pub fn fq_name(&self) -> String {
        if self.subsystem.is_empty() {
            self.name.to_owned()
        } else {
            format!("{}_{}", self.subsystem, self.name)
        }
    }
}

/// Collection point for every authentication metric.
#[derive(Clone)]
pub struct Registry {
    recorder: Arc<dyn Recorder + Send + Sync>,
    names: Arc<Mutex<HashSet<String>>>,
}

impl Registry {
    /// Create a new [`Registry`] writing into `recorder`.
    pub fn new<R>(recorder: R) -> Self
    where
        R: Recorder + Send + Sync + 'static,
    {
        Self {
            recorder: Arc::new(recorder),
            names: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Register a counter without labels.
    pub fn must_register_counter(&self, opts: &Opts<'_>) -> Result<Counter> {
        let name = self.claim(opts)?;
        let counter = self
            .recorder
            .register_counter(&Key::from_name(name.clone()), &metadata());

        tracing::debug!(metric = %name, "counter registered");
        Ok(counter)
    }

    /// Register a counter partitioned by `label`.
    pub fn must_register_counter_vec(
        &self,
        opts: &Opts<'_>,
        label: &'static str,
    ) -> Result<CounterVec> {
        if !is_valid_label_name(label) {
            return Err(Error::registration(
                &opts.fq_name(),
                format!("invalid label name `{label}`"),
            ));
        }

        let name = self.claim(opts)?;
        tracing::debug!(metric = %name, label, "counter vector registered");

        Ok(CounterVec {
            name,
            label,
            recorder: Arc::clone(&self.recorder),
        })
    }

    /// Validate and reserve the metric name, then publish its help text.
    fn claim(&self, opts: &Opts<'_>) -> Result<String> {
        let name = opts.fq_name();
        if !is_valid_metric_name(&name) {
            return Err(Error::registration(&name, "invalid metric name"));
        }

        let inserted = self
            .names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone());
        if !inserted {
            return Err(Error::registration(&name, "duplicate metric name"));
        }

        self.recorder.describe_counter(
            KeyName::from(name.clone()),
            None,
            opts.help.to_owned().into(),
        );

        Ok(name)
    }
}

/// Family of counters keyed by a single label.
#[derive(Clone)]
pub struct CounterVec {
    name: String,
    label: &'static str,
    recorder: Arc<dyn Recorder + Send + Sync>,
}

impl CounterVec {
    /// Get the counter for `value`, creating the series if needed.
    pub fn with_label_values(&self, value: &str) -> Counter {
        let key = Key::from_parts(
            self.name.clone(),
            vec![Label::new(self.label, value.to_owned())],
        );

        self.recorder.register_counter(&key, &metadata())
    }

    /// Create the series for `value` at zero.
    pub fn touch(&self, value: &str) {
        let _ = self.with_label_values(value);
    }

    /// Fully qualified name of the vector.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_fq_name() {
        assert_eq!(
            Opts::new("openshift_auth", "password_total", "").fq_name(),
            "openshift_auth_password_total"
        );
        assert_eq!(Opts::new("", "password_total", "").fq_name(), "password_total");
    }

    #[test]
    fn test_metric_name() {
        assert!(is_valid_metric_name("openshift_auth_password_total"));
        assert!(is_valid_metric_name("job:requests:rate5m"));
        assert!(!is_valid_metric_name("2fa_total"));
        assert!(!is_valid_metric_name("auth-total"));
        assert!(!is_valid_metric_name(""));
    }

    #[test]
    fn test_duplicate_registration() {
        let registry = Registry::new(PrometheusBuilder::new().build_recorder());
        let opts = Opts::new("auth", "attempts", "Counts attempts");

        assert!(registry.must_register_counter(&opts).is_ok());
        assert!(matches!(
            registry.must_register_counter(&opts),
            Err(Error::Registration { .. })
        ));
        // Name is taken whatever the kind of metric.
        assert!(registry.must_register_counter_vec(&opts, "result").is_err());
    }

    #[test]
    fn test_invalid_registration() {
        let registry = Registry::new(PrometheusBuilder::new().build_recorder());

        let bad_name = Opts::new("auth", "attempts-total", "");
        assert!(registry.must_register_counter(&bad_name).is_err());

        let opts = Opts::new("auth", "attempts", "");
        assert!(registry.must_register_counter_vec(&opts, "__result").is_err());
        assert!(registry.must_register_counter_vec(&opts, "re-sult").is_err());
        // A refused label does not reserve the name.
        assert!(registry.must_register_counter_vec(&opts, "result").is_ok());
    }

    #[test]
    fn test_counter_vec_series() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let registry = Registry::new(recorder);

        let vec = registry
            .must_register_counter_vec(
                &Opts::new("auth", "logins", "Counts logins"),
                "provider",
            )
            .unwrap();
        assert_eq!(vec.name(), "auth_logins");

        vec.touch("google");
        vec.with_label_values("github").increment(1);
        vec.with_label_values("github").increment(1);
        vec.with_label_values("gitlab").increment(1);

        let rendered = handle.render();
        assert!(rendered.contains("# HELP auth_logins Counts logins"));
        assert_eq!(sample(&handle, r#"auth_logins{provider="github"}"#), Some(2));
        assert_eq!(sample(&handle, r#"auth_logins{provider="gitlab"}"#), Some(1));
        assert_eq!(sample(&handle, r#"auth_logins{provider="google"}"#), Some(0));
        assert_eq!(sample(&handle, r#"auth_logins{provider="openid"}"#), None);
    }
}
