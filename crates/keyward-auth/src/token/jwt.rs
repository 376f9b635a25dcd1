//! ID token signing.
//!
//! Signs OpenID Connect ID tokens as compact JWTs. The payload is the full
//! [`User`] record plus the registered claims `iat`, `exp`, `aud`, `iss` and
//! `sub`; the header carries the configured algorithm.
//!
//! ## Supported Algorithms
//!
//! - **HS256 / HS384 / HS512**: HMAC with a shared secret
//! - **RS256 / RS384 / RS512**: RSA PKCS#1 v1.5, PEM private key
//! - **PS256 / PS384 / PS512**: RSA-PSS, PEM private key
//! - **ES256 / ES384**: ECDSA (P-256 / P-384), PKCS#8 PEM private key
//! - **EdDSA**: Ed25519, PEM private key
//!
//! ## Example
//!
//! ```ignore
//! use keyward_auth::token::jwt::{IdTokenOptions, SigningAlgorithm, generate_id_token};
//!
//! let options = IdTokenOptions::new(
//!     SigningAlgorithm::RS256,
//!     "my-client",
//!     "https://auth.example.com",
//!     user.subject(),
//! );
//! let id_token = generate_id_token(&user, private_pem.as_bytes(), &options)?;
//! ```

use std::fmt;
use std::str::FromStr;

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::types::User;

/// Lifetime of ID tokens minted by this crate.
pub const ID_TOKEN_LIFETIME: Duration = Duration::days(7);

/// Claims this crate sets itself: the registered claims plus the user's own
/// `uid`. A user record whose attributes carry any of them cannot be signed.
const RESERVED_CLAIMS: [&str; 6] = ["iss", "sub", "aud", "exp", "iat", "uid"];

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while signing a token.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    EncodingError {
        /// Description of the encoding error.
        message: String,
    },

    /// The token claims are invalid.
    #[error("Invalid claims: {message}")]
    InvalidClaims {
        /// Description of why claims are invalid.
        message: String,
    },

    /// Invalid or missing key data.
    #[error("Invalid key: {message}")]
    InvalidKey {
        /// Description of why the key is invalid.
        message: String,
    },

    /// The algorithm name is not supported.
    #[error("Unsupported algorithm: {name}")]
    UnsupportedAlgorithm {
        /// The rejected algorithm name.
        name: String,
    },
}

impl JwtError {
    /// Creates a new `EncodingError`.
    #[must_use]
    pub fn encoding_error(message: impl Into<String>) -> Self {
        Self::EncodingError {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidClaims` error.
    #[must_use]
    pub fn invalid_claims(message: impl Into<String>) -> Self {
        Self::InvalidClaims {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidKey` error.
    #[must_use]
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Creates a new `UnsupportedAlgorithm` error.
    #[must_use]
    pub fn unsupported_algorithm(name: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm { name: name.into() }
    }

    /// Returns `true` if this is a key-related error.
    #[must_use]
    pub fn is_key_error(&self) -> bool {
        matches!(self, Self::InvalidKey { .. })
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidKeyFormat => Self::invalid_key(err.to_string()),
            _ => Self::encoding_error(err.to_string()),
        }
    }
}

// ============================================================================
// Signing Algorithm
// ============================================================================

/// Supported signing algorithms for ID tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// HMAC with SHA-256.
    HS256,
    /// HMAC with SHA-384.
    HS384,
    /// HMAC with SHA-512.
    HS512,
    /// RSA PKCS#1 v1.5 with SHA-256.
    RS256,
    /// RSA PKCS#1 v1.5 with SHA-384.
    RS384,
    /// RSA PKCS#1 v1.5 with SHA-512.
    RS512,
    /// RSA-PSS with SHA-256.
    PS256,
    /// RSA-PSS with SHA-384.
    PS384,
    /// RSA-PSS with SHA-512.
    PS512,
    /// ECDSA with P-256 and SHA-256.
    ES256,
    /// ECDSA with P-384 and SHA-384.
    ES384,
    /// Ed25519.
    EdDSA,
}

impl SigningAlgorithm {
    /// Converts to the `jsonwebtoken` Algorithm type.
    #[must_use]
    pub fn to_jwt_algorithm(self) -> Algorithm {
        match self {
            Self::HS256 => Algorithm::HS256,
            Self::HS384 => Algorithm::HS384,
            Self::HS512 => Algorithm::HS512,
            Self::RS256 => Algorithm::RS256,
            Self::RS384 => Algorithm::RS384,
            Self::RS512 => Algorithm::RS512,
            Self::PS256 => Algorithm::PS256,
            Self::PS384 => Algorithm::PS384,
            Self::PS512 => Algorithm::PS512,
            Self::ES256 => Algorithm::ES256,
            Self::ES384 => Algorithm::ES384,
            Self::EdDSA => Algorithm::EdDSA,
        }
    }

    /// Returns the algorithm name as used in JWT headers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::EdDSA => "EdDSA",
        }
    }

    /// Returns `true` if this is a shared-secret algorithm.
    #[must_use]
    pub fn is_hmac(&self) -> bool {
        matches!(self, Self::HS256 | Self::HS384 | Self::HS512)
    }

    /// Returns `true` if this is an RSA-based algorithm.
    #[must_use]
    pub fn is_rsa(&self) -> bool {
        matches!(
            self,
            Self::RS256 | Self::RS384 | Self::RS512 | Self::PS256 | Self::PS384 | Self::PS512
        )
    }

    /// Returns `true` if this is an EC-based algorithm.
    #[must_use]
    pub fn is_ec(&self) -> bool {
        matches!(self, Self::ES256 | Self::ES384)
    }

    /// Builds the signing key for this algorithm from raw key material.
    ///
    /// HMAC algorithms use the bytes as the shared secret; every other
    /// algorithm expects a PEM-encoded private key.
    ///
    /// # Errors
    /// Returns an error if the key is empty or cannot be parsed.
    pub fn encoding_key(self, private_key: &[u8]) -> Result<EncodingKey, JwtError> {
        if private_key.is_empty() {
            return Err(JwtError::invalid_key("private key must have a value"));
        }

        let key = if self.is_hmac() {
            EncodingKey::from_secret(private_key)
        } else if self.is_rsa() {
            EncodingKey::from_rsa_pem(private_key)?
        } else if self.is_ec() {
            EncodingKey::from_ec_pem(private_key)?
        } else {
            EncodingKey::from_ed_pem(private_key)?
        };
        Ok(key)
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HS256" => Ok(Self::HS256),
            "HS384" => Ok(Self::HS384),
            "HS512" => Ok(Self::HS512),
            "RS256" => Ok(Self::RS256),
            "RS384" => Ok(Self::RS384),
            "RS512" => Ok(Self::RS512),
            "PS256" => Ok(Self::PS256),
            "PS384" => Ok(Self::PS384),
            "PS512" => Ok(Self::PS512),
            "ES256" => Ok(Self::ES256),
            "ES384" => Ok(Self::ES384),
            "EdDSA" => Ok(Self::EdDSA),
            other => Err(JwtError::unsupported_algorithm(other)),
        }
    }
}

// ============================================================================
// Signing Options and Claims
// ============================================================================

/// Header and registered-claim settings for one ID token.
#[derive(Debug, Clone, PartialEq)]
pub struct IdTokenOptions {
    /// Signing algorithm (`alg` header).
    pub algorithm: SigningAlgorithm,

    /// Lifetime added to the issue time to form `exp`.
    pub expires_in: Duration,

    /// Audience (`aud`), the client identifier.
    pub audience: String,

    /// Issuer (`iss`).
    pub issuer: String,

    /// Subject (`sub`), the user identifier.
    pub subject: String,
}

impl IdTokenOptions {
    /// Creates options with the default seven day lifetime.
    #[must_use]
    pub fn new(
        algorithm: SigningAlgorithm,
        audience: impl Into<String>,
        issuer: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            algorithm,
            expires_in: ID_TOKEN_LIFETIME,
            audience: audience.into(),
            issuer: issuer.into(),
            subject: subject.into(),
        }
    }

    /// Sets the token lifetime.
    #[must_use]
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }
}

/// Serialized ID token payload: the user record plus registered claims.
#[derive(Serialize)]
struct IdTokenClaims<'a> {
    #[serde(flatten)]
    user: &'a User,
    iat: i64,
    exp: i64,
    aud: &'a str,
    iss: &'a str,
    sub: &'a str,
}

// ============================================================================
// Signing
// ============================================================================

/// Signs an ID token for `user`.
///
/// # Errors
/// Returns an error if the key is missing or does not fit the algorithm, if
/// the user record already carries a registered claim, or if encoding fails.
pub fn generate_id_token(
    user: &User,
    private_key: &[u8],
    options: &IdTokenOptions,
) -> Result<String, JwtError> {
    if let Some(claim) = RESERVED_CLAIMS
        .iter()
        .find(|claim| user.attributes.contains_key(**claim))
    {
        return Err(JwtError::invalid_claims(format!(
            "user record already has a `{claim}` property"
        )));
    }

    let key = options.algorithm.encoding_key(private_key)?;
    let iat = OffsetDateTime::now_utc().unix_timestamp();
    let exp = iat
        .checked_add(options.expires_in.whole_seconds())
        .ok_or_else(|| JwtError::invalid_claims("token lifetime out of range"))?;
    let claims = IdTokenClaims {
        user,
        iat,
        exp,
        aud: &options.audience,
        iss: &options.issuer,
        sub: &options.subject,
    };

    let header = Header::new(options.algorithm.to_jwt_algorithm());
    encode(&header, &claims, &key).map_err(JwtError::from)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
    use p384::SecretKey as EcSecretKey;
    use p384::pkcs8::EncodePrivateKey as EcEncodePrivateKey;
    use rand::rngs::OsRng;
    use rsa::RsaPrivateKey;
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
    use serde_json::Value;

    const SECRET: &[u8] = b"super-secret-hmac-key";

    fn options(algorithm: SigningAlgorithm) -> IdTokenOptions {
        IdTokenOptions::new(algorithm, "client456", "https://auth.example.com", "123")
    }

    fn validation(algorithm: SigningAlgorithm) -> Validation {
        let mut validation = Validation::new(algorithm.to_jwt_algorithm());
        validation.set_audience(&["client456"]);
        validation.set_issuer(&["https://auth.example.com"]);
        validation
    }

    #[test]
    fn test_hs256_sign_and_decode() {
        let user = User::new(123).with_attribute("email", "ann@example.com");
        let token = generate_id_token(&user, SECRET, &options(SigningAlgorithm::HS256)).unwrap();

        let decoded = decode::<Value>(
            &token,
            &DecodingKey::from_secret(SECRET),
            &validation(SigningAlgorithm::HS256),
        )
        .unwrap();
        let claims = decoded.claims;
        assert_eq!(claims["aud"], "client456");
        assert_eq!(claims["iss"], "https://auth.example.com");
        assert_eq!(claims["sub"], "123");
        assert_eq!(claims["uid"], 123);
        assert_eq!(claims["email"], "ann@example.com");

        let lifetime = claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap();
        assert_eq!(lifetime, 604_800);
    }

    #[test]
    fn test_header_carries_algorithm() {
        let token =
            generate_id_token(&User::new(1), SECRET, &options(SigningAlgorithm::HS512)).unwrap();
        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn test_rs256_sign_and_decode() {
        let private_key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let private_pem = private_key.to_pkcs8_pem(LineEnding::LF).unwrap();
        let public_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap();

        let token = generate_id_token(
            &User::new("alice"),
            private_pem.as_bytes(),
            &options(SigningAlgorithm::RS256),
        )
        .unwrap();

        let decoded = decode::<Value>(
            &token,
            &DecodingKey::from_rsa_pem(public_pem.as_bytes()).unwrap(),
            &validation(SigningAlgorithm::RS256),
        )
        .unwrap();
        assert_eq!(decoded.claims["uid"], "alice");
    }

    #[test]
    fn test_es384_sign() {
        let secret_key = EcSecretKey::random(&mut OsRng);
        let private_pem = secret_key.to_pkcs8_pem(LineEnding::LF).unwrap();

        let token = generate_id_token(
            &User::new(9),
            private_pem.as_bytes(),
            &options(SigningAlgorithm::ES384),
        )
        .unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(decode_header(&token).unwrap().alg, Algorithm::ES384);
    }

    #[test]
    fn test_custom_lifetime() {
        let options = options(SigningAlgorithm::HS256).with_expires_in(Duration::minutes(5));
        let token = generate_id_token(&User::new(1), SECRET, &options).unwrap();
        let decoded = decode::<Value>(
            &token,
            &DecodingKey::from_secret(SECRET),
            &validation(SigningAlgorithm::HS256),
        )
        .unwrap();
        let claims = decoded.claims;
        let lifetime = claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap();
        assert_eq!(lifetime, 300);
    }

    #[test]
    fn test_missing_key_rejected() {
        let err = generate_id_token(&User::new(1), b"", &options(SigningAlgorithm::HS256))
            .unwrap_err();
        assert!(err.is_key_error());
    }

    #[test]
    fn test_garbage_pem_rejected() {
        let err = generate_id_token(
            &User::new(1),
            b"not a pem",
            &options(SigningAlgorithm::RS256),
        )
        .unwrap_err();
        assert!(err.is_key_error());
    }

    #[test]
    fn test_reserved_claim_in_user_rejected() {
        let user = User::new(1).with_attribute("sub", "someone-else");
        let err = generate_id_token(&user, SECRET, &options(SigningAlgorithm::HS256)).unwrap_err();
        assert!(matches!(err, JwtError::InvalidClaims { .. }));
        assert!(err.to_string().contains("`sub`"));
    }

    #[test]
    fn test_uid_attribute_rejected() {
        let user = User::new(1).with_attribute("uid", 2);
        let err = generate_id_token(&user, SECRET, &options(SigningAlgorithm::HS256)).unwrap_err();
        assert!(matches!(err, JwtError::InvalidClaims { .. }));
        assert!(err.to_string().contains("`uid`"));
    }

    #[test]
    fn test_issued_at_attribute_rejected() {
        let user = User::new(1).with_attribute("iat", 0);
        let err = generate_id_token(&user, SECRET, &options(SigningAlgorithm::HS256)).unwrap_err();
        assert!(err.to_string().contains("`iat`"));
    }

    #[test]
    fn test_out_of_range_lifetime_rejected() {
        let options = options(SigningAlgorithm::HS256).with_expires_in(Duration::MAX);
        let err = generate_id_token(&User::new(1), SECRET, &options).unwrap_err();
        assert!(matches!(err, JwtError::InvalidClaims { .. }));
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!(
            "RS256".parse::<SigningAlgorithm>().unwrap(),
            SigningAlgorithm::RS256
        );
        assert_eq!(
            "EdDSA".parse::<SigningAlgorithm>().unwrap(),
            SigningAlgorithm::EdDSA
        );
        assert!(matches!(
            "none".parse::<SigningAlgorithm>(),
            Err(JwtError::UnsupportedAlgorithm { .. })
        ));
        assert!("rs256".parse::<SigningAlgorithm>().is_err());
    }

    #[test]
    fn test_signing_algorithm_properties() {
        assert!(SigningAlgorithm::HS384.is_hmac());
        assert!(SigningAlgorithm::PS256.is_rsa());
        assert!(!SigningAlgorithm::ES256.is_rsa());
        assert!(SigningAlgorithm::ES384.is_ec());
        assert!(!SigningAlgorithm::EdDSA.is_ec());
        assert_eq!(SigningAlgorithm::PS512.to_string(), "PS512");
    }
}
