//! Authorization response types.

pub mod id_token;

pub use id_token::{IdTokenResponseType, with_id_token};
