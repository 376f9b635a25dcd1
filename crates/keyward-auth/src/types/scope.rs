//! OAuth 2.0 scope values.
//!
//! A scope is carried as its raw space-delimited string (RFC 6749 Section
//! 3.3). Before a scope from the wire is used it must pass the `NQSCHAR`
//! syntax check: `%x20-21 / %x23-5B / %x5D-7E`, i.e. printable ASCII and
//! space, excluding the double quote and backslash.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scope value that triggers OpenID Connect ID token issuance.
pub const OPENID_SCOPE: &str = "openid";

/// Returns `true` if `value` is a non-empty string made only of `NQSCHAR`
/// characters.
#[must_use]
pub fn is_nqschar(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| matches!(b, 0x20..=0x21 | 0x23..=0x5B | 0x5D..=0x7E))
}

/// A space-delimited scope string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    /// Wraps a raw scope string without validating it.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }

    /// Builds a scope from individual values.
    #[must_use]
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Self(joined)
    }

    /// Returns the raw scope string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the individual scope values.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    /// Returns `true` if `value` is one of the scope values.
    #[must_use]
    pub fn includes(&self, value: &str) -> bool {
        self.values().any(|v| v == value)
    }

    /// Returns `true` if the scope requests OpenID Connect.
    #[must_use]
    pub fn is_openid(&self) -> bool {
        self.includes(OPENID_SCOPE)
    }

    /// Returns `true` if the raw string passes the `NQSCHAR` check.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        is_nqschar(&self.0)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scope {
    fn from(scope: &str) -> Self {
        Self::new(scope)
    }
}

impl From<String> for Scope {
    fn from(scope: String) -> Self {
        Self(scope)
    }
}
