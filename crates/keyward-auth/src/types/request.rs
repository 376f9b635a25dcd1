//! Inbound token request surface.

use std::collections::HashMap;

use serde::Deserialize;

/// The parsed body of an inbound token request.
///
/// HTTP parsing and routing live in the host; the issuance engine only reads
/// `body["scope"]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Request {
    /// Form fields of the request body.
    #[serde(default)]
    pub body: HashMap<String, String>,
}

impl Request {
    /// Creates a request from body fields.
    #[must_use]
    pub fn from_body<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            body: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a body field.
    #[must_use]
    pub fn body_param(&self, name: &str) -> Option<&str> {
        self.body.get(name).map(String::as_str)
    }
}
