//! Domain types consumed by the issuance engine.
//!
//! - [`Client`] - the authenticated OAuth client
//! - [`User`] - the authenticated resource owner
//! - [`Scope`] - a requested or granted scope string
//! - [`Request`] - the slice of an inbound token request this crate reads

pub mod client;
pub mod request;
pub mod scope;
pub mod user;

pub use client::Client;
pub use request::Request;
pub use scope::Scope;
pub use user::{User, UserId};
