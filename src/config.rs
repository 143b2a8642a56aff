//! Configuration manager for auth-metrics.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry::is_valid_metric_name;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
/// Prefix shared by every authentication metric.
pub const DEFAULT_SUBSYSTEM: &str = "openshift_auth";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Prefix prepended to every metric name.
    pub subsystem: String,
    /// How result labels outside of `success`, `failure` and `error` are
    /// recorded.
    pub result_labels: LabelPolicy,
    #[serde(skip)]
    path: PathBuf,
}

/// Policy applied to result labels at record time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// Any string creates its own series.
    #[default]
    Open,
    /// Unknown strings are recorded as `error`.
    Strict,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            subsystem: DEFAULT_SUBSYSTEM.to_owned(),
            result_labels: LabelPolicy::default(),
            path: PathBuf::default(),
        }
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Set the metric name prefix.
    pub fn subsystem(mut self, subsystem: &str) -> Self {
        self.subsystem = subsystem.to_owned();
        self
    }

    /// Set the result label policy.
    pub fn result_labels(mut self, policy: LabelPolicy) -> Self {
        self.result_labels = policy;
        self
    }

    /// File the configuration was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        if self.path.as_os_str().is_empty() {
            None
        } else {
            Some(&self.path)
        }
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    pub fn read(self) -> Result<Arc<Self>> {
        let file_path = if self.path.is_file() {
            self.path.clone()
        } else {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        match File::open(&file_path) {
            Ok(file) => {
                let mut config: Configuration = serde_yaml::from_reader(file)?;
                config.path = file_path;
                config.validate()?;

                Ok(Arc::new(config))
            },
            Err(err) => {
                tracing::error!(error = %err, path = %file_path.display(), "`config.yaml` file not found");
                self.validate()?;

                Ok(Arc::new(Self {
                    path: PathBuf::default(),
                    ..self
                }))
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.subsystem.is_empty() && !is_valid_metric_name(&self.subsystem)
        {
            return Err(Error::InvalidSubsystem(self.subsystem.clone()));
        }

        Ok(())
    }
}
