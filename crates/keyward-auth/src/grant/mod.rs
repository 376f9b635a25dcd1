//! Grant type foundations.
//!
//! - [`GrantTypeBase`] - token generation, lifetimes and scope handling
//!   shared by every grant type
//! - [`OpenIdOptions`] - settings for signing ID tokens directly

pub mod base;
pub mod openid;

pub use base::{GrantTypeBase, GrantTypeOptions, MAX_TOKEN_LIFETIME};
pub use openid::OpenIdOptions;
