//! OAuth 2.0 client as seen by the issuance engine.
//!
//! Ownership, registration and authentication of clients happen elsewhere;
//! this crate only needs the client identifier (the ID token audience).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An authenticated OAuth 2.0 client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Client identifier. An empty identifier is treated as missing.
    #[serde(default)]
    pub id: String,

    /// Any further attributes the host keeps on its client records.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Client {
    /// Creates a client with the given identifier and no extra attributes.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    /// Returns the identifier, or `None` when it is empty.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        if self.id.is_empty() {
            None
        } else {
            Some(&self.id)
        }
    }
}
