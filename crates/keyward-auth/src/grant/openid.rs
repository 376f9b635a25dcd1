//! OpenID Connect signing settings and the shared ID token contract.
//!
//! Both [`GrantTypeBase`](super::GrantTypeBase) and
//! [`IdTokenResponseType`](crate::response::IdTokenResponseType) run the
//! same argument checks before an ID token is minted:
//!
//! 1. no scope, or a scope without `openid`: nothing to issue
//! 2. no user: server error
//! 3. empty `client.id`: invalid argument
//! 4. missing algorithm or issuer: invalid argument (direct signing only)

use std::fmt;

use crate::AuthResult;
use crate::error::AuthError;
use crate::token::jwt::{IdTokenOptions, SigningAlgorithm, generate_id_token};
use crate::types::{Client, Scope, User};

/// Settings needed to sign ID tokens without a model override.
#[derive(Clone, Default, PartialEq)]
pub struct OpenIdOptions {
    /// Signing algorithm (`openidAlgorithm`).
    pub algorithm: Option<SigningAlgorithm>,

    /// Issuer claim value (`openidIssuer`).
    pub issuer: Option<String>,

    /// HMAC secret or PEM-encoded private key (`openidPrivateKey`).
    pub private_key: Option<Vec<u8>>,
}

impl OpenIdOptions {
    /// Creates fully populated signing settings.
    #[must_use]
    pub fn new(
        algorithm: SigningAlgorithm,
        issuer: impl Into<String>,
        private_key: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            algorithm: Some(algorithm),
            issuer: Some(issuer.into()),
            private_key: Some(private_key.into()),
        }
    }
}

impl fmt::Debug for OpenIdOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenIdOptions")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// A request that passed the ID token argument checks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IdTokenRequest<'a> {
    pub client_id: &'a str,
    pub user: &'a User,
    pub scope: &'a Scope,
}

/// Runs checks 1-3. `Ok(None)` means no ID token applies to this request.
pub(crate) fn check_id_token_request<'a>(
    client: &'a Client,
    user: Option<&'a User>,
    scope: Option<&'a Scope>,
) -> AuthResult<Option<IdTokenRequest<'a>>> {
    let Some(scope) = scope.filter(|s| s.is_openid()) else {
        tracing::trace!("No openid scope requested, skipping ID token");
        return Ok(None);
    };

    let user =
        user.ok_or_else(|| AuthError::server("Server error: `user` must be a User instance"))?;

    let client_id = client
        .id()
        .ok_or_else(|| AuthError::missing_parameter("client.id"))?;

    Ok(Some(IdTokenRequest {
        client_id,
        user,
        scope,
    }))
}

/// Runs check 4 and signs the token directly.
pub(crate) fn sign_id_token(
    request: &IdTokenRequest<'_>,
    openid: &OpenIdOptions,
) -> AuthResult<String> {
    let algorithm = openid
        .algorithm
        .ok_or_else(|| AuthError::missing_parameter("openidAlgorithm"))?;

    let issuer = openid
        .issuer
        .as_deref()
        .ok_or_else(|| AuthError::missing_parameter("openidIssuer"))?;

    let options = IdTokenOptions::new(
        algorithm,
        request.client_id,
        issuer,
        request.user.subject(),
    );
    let private_key = openid.private_key.as_deref().unwrap_or_default();

    tracing::debug!(
        client_id = %request.client_id,
        algorithm = %algorithm,
        "Signing ID token"
    );
    Ok(generate_id_token(request.user, private_key, &options)?)
}
