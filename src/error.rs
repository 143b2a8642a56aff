//! Error handler for auth-metrics.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// A metric could not be registered.
    /// This is a programming error and must stop the process at startup.
    #[error("cannot register metric `{name}`: {reason}")]
    Registration { name: String, reason: String },

    #[error("unknown {kind} label `{value}`")]
    UnknownLabel { kind: &'static str, value: String },

    #[error("failed to deserialize `config.yaml`: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("`{0}` is not a valid metric name prefix")]
    InvalidSubsystem(String),
}

impl Error {
    pub(crate) fn registration(name: &str, reason: impl Into<String>) -> Self {
        Error::Registration {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
