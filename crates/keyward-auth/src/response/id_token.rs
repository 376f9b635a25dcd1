//! `id_token` response type.
//!
//! Attaches an OpenID Connect ID token to the redirect of an
//! authorization-code style flow that has already minted its code. The token
//! is signed eagerly on construction with explicitly passed settings; unlike
//! [`GrantTypeBase`](crate::grant::GrantTypeBase) there is no model override.
//!
//! # Example
//!
//! ```ignore
//! let response = IdTokenResponseType::new(Some(&code), &client, Some(&user), Some(&scope), &openid)?;
//! let location = response.build_redirect_uri("https://app.example.com/callback?state=xyz")?;
//! // https://app.example.com/callback?state=xyz&id_token=eyJ...
//! ```

use url::Url;

use crate::AuthResult;
use crate::error::AuthError;
use crate::grant::openid::{OpenIdOptions, check_id_token_request, sign_id_token};
use crate::types::{Client, Scope, User};

/// Query parameter carrying the ID token.
pub const ID_TOKEN_PARAM: &str = "id_token";

/// An authorization response carrying a pre-signed ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdTokenResponseType {
    id_token: Option<String>,
}

impl IdTokenResponseType {
    /// Signs the ID token for this response.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `code` is missing or empty
    /// - every error of [`IdTokenResponseType::sign_id_token`]
    pub fn new(
        code: Option<&str>,
        client: &Client,
        user: Option<&User>,
        scope: Option<&Scope>,
        options: &OpenIdOptions,
    ) -> AuthResult<Self> {
        if code.is_none_or(str::is_empty) {
            return Err(AuthError::missing_parameter("code"));
        }

        let id_token = Self::sign_id_token(client, user, scope, options)?;
        Ok(Self { id_token })
    }

    /// Signs an ID token with explicit settings.
    ///
    /// Returns `Ok(None)` when the scope is absent or lacks `openid`; callers
    /// treat that as "not applicable", never as a failure.
    ///
    /// # Errors
    ///
    /// - `Server` if the user is missing
    /// - `InvalidArgument` if `client.id`, the algorithm or the issuer is
    ///   missing
    /// - `Signing` if the key does not fit the algorithm
    pub fn sign_id_token(
        client: &Client,
        user: Option<&User>,
        scope: Option<&Scope>,
        options: &OpenIdOptions,
    ) -> AuthResult<Option<String>> {
        match check_id_token_request(client, user, scope)? {
            Some(request) => sign_id_token(&request, options).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the signed ID token, if one applied.
    #[must_use]
    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }

    /// Returns `redirect_uri` with its `id_token` query parameter set.
    ///
    /// The query is re-serialized from its parsed pairs; turning the result
    /// into a `Location` header is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `redirect_uri` is empty or not an
    /// absolute URI.
    pub fn build_redirect_uri(&self, redirect_uri: &str) -> AuthResult<Url> {
        if redirect_uri.is_empty() {
            return Err(AuthError::missing_parameter("redirectUri"));
        }

        let uri = Url::parse(redirect_uri).map_err(|e| {
            tracing::debug!(error = %e, "Unparseable redirect URI");
            AuthError::invalid_parameter("redirectUri")
        })?;

        tracing::debug!(
            host = uri.host_str().unwrap_or_default(),
            has_id_token = self.id_token.is_some(),
            "Building ID token redirect"
        );
        Ok(with_id_token(uri, self.id_token.as_deref()))
    }
}

/// Returns `uri` with the `id_token` query parameter set to `id_token`.
///
/// An existing `id_token` parameter is overwritten in place (duplicates are
/// dropped); other parameters keep their order. With `None` any stale
/// `id_token` parameter is removed.
#[must_use]
pub fn with_id_token(mut uri: Url, id_token: Option<&str>) -> Url {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut replaced = false;
    for (key, value) in uri.query_pairs() {
        if key != ID_TOKEN_PARAM {
            pairs.push((key.into_owned(), value.into_owned()));
            continue;
        }
        if let (Some(token), false) = (id_token, replaced) {
            pairs.push((key.into_owned(), token.to_string()));
            replaced = true;
        }
    }
    if let (Some(token), false) = (id_token, replaced) {
        pairs.push((ID_TOKEN_PARAM.to_string(), token.to_string()));
    }

    uri.set_query(None);
    if !pairs.is_empty() {
        uri.query_pairs_mut().extend_pairs(pairs);
    }
    uri
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::SigningAlgorithm;

    fn openid() -> OpenIdOptions {
        OpenIdOptions::new(
            SigningAlgorithm::HS256,
            "https://auth.example.com",
            b"response-test-secret".as_slice(),
        )
    }

    fn response_with(id_token: Option<&str>) -> IdTokenResponseType {
        IdTokenResponseType {
            id_token: id_token.map(str::to_string),
        }
    }

    #[test]
    fn test_new_requires_code() {
        let client = Client::new("app");
        let scope = Scope::new("openid");

        for code in [None, Some("")] {
            let err = IdTokenResponseType::new(
                code,
                &client,
                Some(&User::new(1)),
                Some(&scope),
                &openid(),
            )
            .unwrap_err();
            assert_eq!(err.to_string(), "Missing parameter: `code`");
        }
    }

    #[test]
    fn test_new_signs_eagerly() {
        let scope = Scope::new("openid profile");
        let response = IdTokenResponseType::new(
            Some("auth-code"),
            &Client::new("app"),
            Some(&User::new(1)),
            Some(&scope),
            &openid(),
        )
        .unwrap();
        let token = response.id_token().unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_sign_id_token_not_applicable() {
        let scope = Scope::new("profile");
        let token = IdTokenResponseType::sign_id_token(
            &Client::new("app"),
            Some(&User::new(1)),
            Some(&scope),
            &openid(),
        )
        .unwrap();
        assert!(token.is_none());
    }

    #[test]
    fn test_sign_id_token_errors() {
        let scope = Scope::new("openid");

        let err =
            IdTokenResponseType::sign_id_token(&Client::new("app"), None, Some(&scope), &openid())
                .unwrap_err();
        assert!(matches!(err, AuthError::Server { .. }));

        let err = IdTokenResponseType::sign_id_token(
            &Client::new(""),
            Some(&User::new(1)),
            Some(&scope),
            &openid(),
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidArgument { .. }));

        let err = IdTokenResponseType::sign_id_token(
            &Client::new("app"),
            Some(&User::new(1)),
            Some(&scope),
            &OpenIdOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing parameter: `openidAlgorithm`");
    }

    #[test]
    fn test_build_redirect_uri_preserves_query() {
        let uri = response_with(Some("abc"))
            .build_redirect_uri("https://cb.example/cb?x=1")
            .unwrap();
        assert_eq!(uri.query(), Some("x=1&id_token=abc"));
        assert_eq!(uri.path(), "/cb");
        assert_eq!(uri.as_str(), "https://cb.example/cb?x=1&id_token=abc");
    }

    #[test]
    fn test_build_redirect_uri_overwrites_existing_token() {
        let uri = response_with(Some("fresh"))
            .build_redirect_uri("https://cb.example/cb?id_token=stale&x=1&id_token=older")
            .unwrap();
        assert_eq!(uri.query(), Some("id_token=fresh&x=1"));
    }

    #[test]
    fn test_build_redirect_uri_without_query() {
        let uri = response_with(Some("abc"))
            .build_redirect_uri("https://cb.example/cb")
            .unwrap();
        assert_eq!(uri.as_str(), "https://cb.example/cb?id_token=abc");
    }

    #[test]
    fn test_build_redirect_uri_without_token_drops_stale_param() {
        let uri = response_with(None)
            .build_redirect_uri("https://cb.example/cb?id_token=stale")
            .unwrap();
        assert_eq!(uri.query(), None);
    }

    #[test]
    fn test_build_redirect_uri_rejects_empty_and_relative() {
        let response = response_with(Some("abc"));

        let err = response.build_redirect_uri("").unwrap_err();
        assert_eq!(err.to_string(), "Missing parameter: `redirectUri`");

        let err = response.build_redirect_uri("/relative/cb").unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter: `redirectUri`");
    }

    #[test]
    fn test_with_id_token_does_not_touch_fragment() {
        let uri = Url::parse("https://cb.example/cb?x=1#frag").unwrap();
        let uri = with_id_token(uri, Some("abc"));
        assert_eq!(uri.fragment(), Some("frag"));
        assert_eq!(uri.query(), Some("x=1&id_token=abc"));
    }
}
