//! Token issuance primitives.
//!
//! This module provides the stateless fallbacks used when the host model
//! does not mint tokens itself:
//!
//! - Opaque random tokens for access and refresh tokens
//! - Signed JWTs for OpenID Connect ID tokens

pub mod jwt;
pub mod random;

pub use jwt::{
    ID_TOKEN_LIFETIME, IdTokenOptions, JwtError, SigningAlgorithm, generate_id_token,
};
pub use random::{RANDOM_TOKEN_LENGTH, generate_random_token};
