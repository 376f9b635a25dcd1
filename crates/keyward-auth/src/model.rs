//! Host-supplied model capabilities.
//!
//! The model is how a host injects storage-aware or business-specific token
//! semantics. Every capability is optional: when one is absent the grant type
//! falls back to the built-in behavior (random opaque tokens, direct ID token
//! signing, permissive scope validation).
//!
//! Capabilities are resolved once, when the [`Model`] is built, and never
//! probed again per call.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use keyward_auth::model::Model;
//!
//! let storage = Arc::new(MyTokenStore::new());
//! let model = Model::builder()
//!     .access_token_generator(storage.clone())
//!     .scope_validator(storage)
//!     .build();
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::{Client, Scope, User};

// =============================================================================
// Capability Traits
// =============================================================================

/// Mints access tokens in a host-specific format.
#[async_trait]
pub trait AccessTokenGenerator: Send + Sync {
    /// Returns the access token, or `None`/an empty string to request the
    /// built-in random token.
    ///
    /// # Errors
    ///
    /// Errors propagate to the caller unchanged.
    async fn generate_access_token(
        &self,
        client: &Client,
        user: Option<&User>,
        scope: Option<&Scope>,
    ) -> AuthResult<Option<String>>;
}

/// Mints refresh tokens in a host-specific format.
#[async_trait]
pub trait RefreshTokenGenerator: Send + Sync {
    /// Returns the refresh token, or `None`/an empty string to request the
    /// built-in random token.
    ///
    /// # Errors
    ///
    /// Errors propagate to the caller unchanged.
    async fn generate_refresh_token(
        &self,
        client: &Client,
        user: Option<&User>,
        scope: Option<&Scope>,
    ) -> AuthResult<Option<String>>;
}

/// Mints OpenID Connect ID tokens.
///
/// The result is handed to the caller verbatim; the built-in signer is not
/// consulted and the token is not validated here.
#[async_trait]
pub trait IdTokenGenerator: Send + Sync {
    /// Returns the ID token for an `openid` request.
    ///
    /// # Errors
    ///
    /// Errors propagate to the caller unchanged.
    async fn generate_id_token(
        &self,
        client: &Client,
        user: &User,
        scope: &Scope,
    ) -> AuthResult<Option<String>>;
}

/// Validates, and possibly narrows, a requested scope.
#[async_trait]
pub trait ScopeValidator: Send + Sync {
    /// Returns the granted scope, or `None` to reject the request.
    ///
    /// # Errors
    ///
    /// Errors propagate to the caller unchanged.
    async fn validate_scope(
        &self,
        user: Option<&User>,
        client: &Client,
        scope: Option<&Scope>,
    ) -> AuthResult<Option<Scope>>;
}

// =============================================================================
// Model
// =============================================================================

/// The set of capabilities a host registered.
#[derive(Clone, Default)]
pub struct Model {
    access_token_generator: Option<Arc<dyn AccessTokenGenerator>>,
    refresh_token_generator: Option<Arc<dyn RefreshTokenGenerator>>,
    id_token_generator: Option<Arc<dyn IdTokenGenerator>>,
    scope_validator: Option<Arc<dyn ScopeValidator>>,
}

impl Model {
    /// Creates a builder with no capabilities registered.
    #[must_use]
    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    /// Returns the access token capability, if registered.
    #[must_use]
    pub fn access_token_generator(&self) -> Option<&Arc<dyn AccessTokenGenerator>> {
        self.access_token_generator.as_ref()
    }

    /// Returns the refresh token capability, if registered.
    #[must_use]
    pub fn refresh_token_generator(&self) -> Option<&Arc<dyn RefreshTokenGenerator>> {
        self.refresh_token_generator.as_ref()
    }

    /// Returns the ID token capability, if registered.
    #[must_use]
    pub fn id_token_generator(&self) -> Option<&Arc<dyn IdTokenGenerator>> {
        self.id_token_generator.as_ref()
    }

    /// Returns the scope validation capability, if registered.
    #[must_use]
    pub fn scope_validator(&self) -> Option<&Arc<dyn ScopeValidator>> {
        self.scope_validator.as_ref()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("access_token_generator", &self.access_token_generator.is_some())
            .field("refresh_token_generator", &self.refresh_token_generator.is_some())
            .field("id_token_generator", &self.id_token_generator.is_some())
            .field("scope_validator", &self.scope_validator.is_some())
            .finish()
    }
}

/// Builder for [`Model`].
#[derive(Default)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    /// Registers the access token capability.
    #[must_use]
    pub fn access_token_generator(mut self, generator: Arc<dyn AccessTokenGenerator>) -> Self {
        self.model.access_token_generator = Some(generator);
        self
    }

    /// Registers the refresh token capability.
    #[must_use]
    pub fn refresh_token_generator(mut self, generator: Arc<dyn RefreshTokenGenerator>) -> Self {
        self.model.refresh_token_generator = Some(generator);
        self
    }

    /// Registers the ID token capability.
    #[must_use]
    pub fn id_token_generator(mut self, generator: Arc<dyn IdTokenGenerator>) -> Self {
        self.model.id_token_generator = Some(generator);
        self
    }

    /// Registers the scope validation capability.
    #[must_use]
    pub fn scope_validator(mut self, validator: Arc<dyn ScopeValidator>) -> Self {
        self.model.scope_validator = Some(validator);
        self
    }

    /// Builds the model.
    #[must_use]
    pub fn build(self) -> Model {
        self.model
    }
}
