//! Closed label vocabularies used by authentication counters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Outcome of a password authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthResult {
    Success,
    Failure,
    Error,
}

impl AuthResult {
    /// Every result, in the order series are pre-initialized.
    pub const ALL: [AuthResult; 3] =
        [AuthResult::Success, AuthResult::Failure, AuthResult::Error];

    pub const fn as_str(&self) -> &'static str {
        match self {
            AuthResult::Success => "success",
            AuthResult::Failure => "failure",
            AuthResult::Error => "error",
        }
    }
}

/// Identity provider a certificate check was performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    GitHub,
    GitLab,
    Google,
    OpenId,
    BasicAuth,
    Keystone,
}

impl Provider {
    /// Every provider, in the order series are pre-initialized.
    pub const ALL: [Provider; 6] = [
        Provider::GitHub,
        Provider::GitLab,
        Provider::Google,
        Provider::OpenId,
        Provider::Keystone,
        Provider::BasicAuth,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Provider::GitHub => "github",
            Provider::GitLab => "gitlab",
            Provider::Google => "google",
            Provider::OpenId => "openid",
            Provider::BasicAuth => "basicauth",
            Provider::Keystone => "keystone",
        }
    }
}

impl FromStr for AuthResult {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuthResult::ALL
            .into_iter()
            .find(|result| result.as_str() == s)
            .ok_or_else(|| Error::UnknownLabel {
                kind: "result",
                value: s.to_owned(),
            })
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|provider| provider.as_str() == s)
            .ok_or_else(|| Error::UnknownLabel {
                kind: "provider",
                value: s.to_owned(),
            })
    }
}

impl AsRef<str> for AuthResult {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Provider {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AuthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
