//! Shared base for grant type implementations.
//!
//! Concrete grant types (authorization code, password, client credentials,
//! refresh token) live in the host and build on [`GrantTypeBase`] for token
//! generation, lifetime computation and scope handling.
//!
//! # Delegation
//!
//! For every `generate_*` operation the model capability, when registered,
//! is the source of truth. The random token and JWT signing paths are only
//! fallbacks for hosts that do not need custom token formats.
//!
//! # Usage
//!
//! ```ignore
//! use keyward_auth::grant::{GrantTypeBase, GrantTypeOptions};
//!
//! let grant = GrantTypeBase::new(
//!     GrantTypeOptions::new(Duration::from_secs(3600), model)
//!         .with_refresh_token_lifetime(Duration::from_secs(14 * 24 * 3600)),
//! )?;
//!
//! let access_token = grant.generate_access_token(&client, Some(&user), scope.as_ref()).await?;
//! let expires_at = grant.get_access_token_expires_at();
//! ```

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;

use super::openid::{OpenIdOptions, check_id_token_request, sign_id_token};
use crate::AuthResult;
use crate::error::AuthError;
use crate::model::Model;
use crate::token::generate_random_token;
use crate::types::{Client, Request, Scope, User};

/// Longest accepted token lifetime (100 years). Keeps expiry timestamps
/// representable.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

/// Constructor options for [`GrantTypeBase`].
///
/// `access_token_lifetime` and `model` are required; [`GrantTypeBase::new`]
/// rejects options without them.
#[derive(Debug, Clone, Default)]
pub struct GrantTypeOptions {
    /// Access token lifetime. Required, must be non-zero.
    pub access_token_lifetime: Option<Duration>,

    /// Host model capabilities. Required.
    pub model: Option<Arc<Model>>,

    /// Refresh token lifetime. `None` means refresh tokens are not
    /// time-bounded here.
    pub refresh_token_lifetime: Option<Duration>,

    /// Advisory policy for refresh grants: issue a new refresh token on each
    /// refresh instead of reusing the presented one.
    pub always_issue_new_refresh_token: bool,

    /// ID token signing settings.
    pub openid: OpenIdOptions,
}

impl GrantTypeOptions {
    /// Creates options with the two required settings.
    #[must_use]
    pub fn new(access_token_lifetime: Duration, model: Arc<Model>) -> Self {
        Self {
            access_token_lifetime: Some(access_token_lifetime),
            model: Some(model),
            ..Self::default()
        }
    }

    /// Sets the refresh token lifetime.
    #[must_use]
    pub fn with_refresh_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.refresh_token_lifetime = Some(lifetime);
        self
    }

    /// Sets the refresh token rotation policy.
    #[must_use]
    pub fn with_always_issue_new_refresh_token(mut self, always: bool) -> Self {
        self.always_issue_new_refresh_token = always;
        self
    }

    /// Sets the ID token signing settings.
    #[must_use]
    pub fn with_openid(mut self, openid: OpenIdOptions) -> Self {
        self.openid = openid;
        self
    }
}

/// Token generation and scope handling shared by all grant types.
///
/// The configuration is read-only after construction, so one instance can
/// serve concurrent requests.
#[derive(Debug, Clone)]
pub struct GrantTypeBase {
    access_token_lifetime: Duration,
    refresh_token_lifetime: Option<Duration>,
    always_issue_new_refresh_token: bool,
    model: Arc<Model>,
    openid: OpenIdOptions,
}

impl GrantTypeBase {
    /// Creates a grant type base from options.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `access_token_lifetime` is missing or
    /// zero, if either lifetime exceeds [`MAX_TOKEN_LIFETIME`], or if `model`
    /// is missing.
    pub fn new(options: GrantTypeOptions) -> AuthResult<Self> {
        let access_token_lifetime = options
            .access_token_lifetime
            .filter(|lifetime| !lifetime.is_zero())
            .ok_or_else(|| AuthError::missing_parameter("accessTokenLifetime"))?;
        if access_token_lifetime > MAX_TOKEN_LIFETIME {
            return Err(AuthError::invalid_parameter("accessTokenLifetime"));
        }
        if options
            .refresh_token_lifetime
            .is_some_and(|lifetime| lifetime > MAX_TOKEN_LIFETIME)
        {
            return Err(AuthError::invalid_parameter("refreshTokenLifetime"));
        }

        let model = options
            .model
            .ok_or_else(|| AuthError::missing_parameter("model"))?;

        Ok(Self {
            access_token_lifetime,
            refresh_token_lifetime: options.refresh_token_lifetime,
            always_issue_new_refresh_token: options.always_issue_new_refresh_token,
            model,
            openid: options.openid,
        })
    }

    /// Returns the configured access token lifetime.
    #[must_use]
    pub fn access_token_lifetime(&self) -> Duration {
        self.access_token_lifetime
    }

    /// Returns the configured refresh token lifetime, if any.
    #[must_use]
    pub fn refresh_token_lifetime(&self) -> Option<Duration> {
        self.refresh_token_lifetime
    }

    /// Returns the refresh token rotation policy.
    #[must_use]
    pub fn always_issue_new_refresh_token(&self) -> bool {
        self.always_issue_new_refresh_token
    }

    /// Returns the host model.
    #[must_use]
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Returns the ID token signing settings.
    #[must_use]
    pub fn openid(&self) -> &OpenIdOptions {
        &self.openid
    }

    /// Generates an access token.
    ///
    /// Uses the model's access token generator when registered; an empty or
    /// missing result falls back to a random opaque token.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the model capability.
    pub async fn generate_access_token(
        &self,
        client: &Client,
        user: Option<&User>,
        scope: Option<&Scope>,
    ) -> AuthResult<String> {
        let token = match self.model.access_token_generator() {
            Some(generator) => generator
                .generate_access_token(client, user, scope)
                .await?
                .filter(|token| !token.is_empty()),
            None => None,
        };

        match token {
            Some(token) => {
                tracing::debug!(client_id = %client.id, "Access token supplied by model");
                Ok(token)
            }
            None => {
                tracing::debug!(client_id = %client.id, "Generating random access token");
                Ok(generate_random_token().await)
            }
        }
    }

    /// Generates an OpenID Connect ID token.
    ///
    /// Returns `Ok(None)` when the scope is absent or lacks `openid`. The
    /// model's ID token generator, when registered, is returned verbatim;
    /// otherwise the token is signed with the configured settings, valid for
    /// seven days, with `aud` = client id, `iss` = configured issuer and
    /// `sub` = user id.
    ///
    /// # Errors
    ///
    /// - `Server` if the user is missing
    /// - `InvalidArgument` if `client.id` is empty, or if signing directly
    ///   and `openidAlgorithm` or `openidIssuer` is not configured
    /// - `Signing` if the key does not fit the algorithm
    pub async fn generate_id_token(
        &self,
        client: &Client,
        user: Option<&User>,
        scope: Option<&Scope>,
    ) -> AuthResult<Option<String>> {
        let Some(request) = check_id_token_request(client, user, scope)? else {
            return Ok(None);
        };

        if let Some(generator) = self.model.id_token_generator() {
            tracing::debug!(client_id = %request.client_id, "ID token delegated to model");
            return generator
                .generate_id_token(client, request.user, request.scope)
                .await;
        }

        sign_id_token(&request, &self.openid).map(Some)
    }

    /// Generates a refresh token.
    ///
    /// Uses the model's refresh token generator when registered; an empty or
    /// missing result falls back to a random opaque token.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the model capability.
    pub async fn generate_refresh_token(
        &self,
        client: &Client,
        user: Option<&User>,
        scope: Option<&Scope>,
    ) -> AuthResult<String> {
        let token = match self.model.refresh_token_generator() {
            Some(generator) => generator
                .generate_refresh_token(client, user, scope)
                .await?
                .filter(|token| !token.is_empty()),
            None => None,
        };

        match token {
            Some(token) => {
                tracing::debug!(client_id = %client.id, "Refresh token supplied by model");
                Ok(token)
            }
            None => {
                tracing::debug!(client_id = %client.id, "Generating random refresh token");
                Ok(generate_random_token().await)
            }
        }
    }

    /// Returns when an access token issued now expires.
    #[must_use]
    pub fn get_access_token_expires_at(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc() + self.access_token_lifetime
    }

    /// Returns when a refresh token issued now expires, or `None` when no
    /// refresh token lifetime is configured.
    #[must_use]
    pub fn get_refresh_token_expires_at(&self) -> Option<OffsetDateTime> {
        self.refresh_token_lifetime
            .map(|lifetime| OffsetDateTime::now_utc() + lifetime)
    }

    /// Extracts the `scope` parameter from the request body.
    ///
    /// Returns `Ok(None)` when the body carries no scope.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the scope contains characters outside
    /// the `NQSCHAR` set (or is empty).
    pub fn get_scope(&self, request: &Request) -> AuthResult<Option<Scope>> {
        let Some(raw) = request.body_param("scope") else {
            return Ok(None);
        };

        let scope = Scope::new(raw);
        if !scope.is_well_formed() {
            return Err(AuthError::invalid_parameter("scope"));
        }
        Ok(Some(scope))
    }

    /// Validates the requested scope against the model.
    ///
    /// Without a registered scope validator the scope passes through
    /// unchanged. Otherwise the validator's (possibly narrowed) scope is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScope` if the validator rejects the scope, or any
    /// error it raises.
    pub async fn validate_scope(
        &self,
        user: Option<&User>,
        client: &Client,
        scope: Option<&Scope>,
    ) -> AuthResult<Option<Scope>> {
        let Some(validator) = self.model.scope_validator() else {
            return Ok(scope.cloned());
        };

        match validator.validate_scope(user, client, scope).await? {
            Some(granted) => Ok(Some(granted)),
            None => {
                tracing::warn!(client_id = %client.id, "Model rejected requested scope");
                Err(AuthError::invalid_scope(
                    "Invalid scope: Requested scope is invalid",
                ))
            }
        }
    }
}
