//! Resource owner record.
//!
//! # Security
//!
//! When this crate signs an ID token itself, the *whole* user record is
//! serialized into the token claims. Hosts should strip anything that must
//! not reach the client (password hashes, internal flags) before handing the
//! user over, or register an [`IdTokenGenerator`](crate::model::IdTokenGenerator)
//! that controls the claim set.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a resource owner. Hosts use either numeric or string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    /// Numeric identifier (e.g. a database sequence).
    Numeric(i64),
    /// Textual identifier (e.g. a UUID).
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::Numeric(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// An authenticated resource owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable user identifier, rendered as the ID token `sub`.
    pub uid: UserId,

    /// Profile attributes (name, email, ...). Embedded as ID token claims.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl User {
    /// Creates a user with no profile attributes.
    #[must_use]
    pub fn new(uid: impl Into<UserId>) -> Self {
        Self {
            uid: uid.into(),
            attributes: Map::new(),
        }
    }

    /// Adds a profile attribute.
    ///
    /// Attributes named after a claim the signer sets (`uid`, `iss`, `sub`,
    /// `aud`, `exp`, `iat`) make ID token signing fail.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns the `sub` claim value for this user.
    #[must_use]
    pub fn subject(&self) -> String {
        self.uid.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_renders_numeric_uid() {
        assert_eq!(User::new(42).subject(), "42");
        assert_eq!(User::new("alice").subject(), "alice");
    }

    #[test]
    fn test_serialize_flattens_attributes() {
        let user = User::new(7).with_attribute("email", "a@example.com");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["uid"], 7);
        assert_eq!(json["email"], "a@example.com");
    }

    #[test]
    fn test_deserialize_string_uid() {
        let user: User = serde_json::from_str(r#"{"uid":"u-1","name":"Ann"}"#).unwrap();
        assert_eq!(user.uid, UserId::Text("u-1".to_string()));
        assert_eq!(user.attributes["name"], "Ann");
    }
}
