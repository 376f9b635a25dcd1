//! # keyward-auth
//!
//! Pluggable OAuth 2.0 / OpenID Connect token issuance engine.
//!
//! This crate provides:
//! - A grant type base that mints access, refresh and ID tokens
//! - A host-supplied model through which any token's shape can be overridden
//! - Opaque random tokens and signed JWT ID tokens as built-in fallbacks
//! - Scope syntax checks and model-driven scope validation
//! - The `id_token` response type for attaching ID tokens to redirects
//!
//! ## Overview
//!
//! A grant type implemented by the host calls [`GrantTypeBase`] to obtain
//! tokens. Each `generate_*` call asks the [`Model`] first and falls back to
//! the [`token`] primitives when the model has no opinion. HTTP handling,
//! client authentication and token persistence stay with the host.
//!
//! ## Modules
//!
//! - [`config`] - File-based issuance configuration
//! - [`error`] - Error taxonomy
//! - [`grant`] - Grant type base and OpenID signing settings
//! - [`model`] - Model capability traits
//! - [`response`] - `id_token` response type
//! - [`token`] - Random token generation and ID token signing
//! - [`types`] - Client, user, scope and request types

pub mod config;
pub mod error;
pub mod grant;
pub mod model;
pub mod response;
pub mod token;
pub mod types;

pub use config::{ConfigError, IssuerConfig, OpenIdConfig};
pub use error::{AuthError, ErrorCategory};
pub use grant::{GrantTypeBase, GrantTypeOptions, OpenIdOptions};
pub use model::{
    AccessTokenGenerator, IdTokenGenerator, Model, ModelBuilder, RefreshTokenGenerator,
    ScopeValidator,
};
pub use response::IdTokenResponseType;
pub use token::{
    ID_TOKEN_LIFETIME, IdTokenOptions, JwtError, SigningAlgorithm, generate_id_token,
    generate_random_token,
};
pub use types::{Client, Request, Scope, User, UserId};

/// Type alias for issuance results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use keyward_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::{ConfigError, IssuerConfig};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::grant::{GrantTypeBase, GrantTypeOptions, OpenIdOptions};
    pub use crate::model::{
        AccessTokenGenerator, IdTokenGenerator, Model, RefreshTokenGenerator, ScopeValidator,
    };
    pub use crate::response::IdTokenResponseType;
    pub use crate::token::SigningAlgorithm;
    pub use crate::types::{Client, Request, Scope, User, UserId};
}
