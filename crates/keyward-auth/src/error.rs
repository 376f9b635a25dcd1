//! Token issuance error types.
//!
//! Every failure inside this crate aborts the current operation and reaches
//! the caller as an [`AuthError`] carrying a human-readable message. Nothing
//! is retried or swallowed here.

use std::fmt;

use crate::token::jwt::JwtError;

/// Errors that can occur while issuing tokens.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required constructor option, configuration value, or argument is
    /// missing or malformed.
    #[error("{message}")]
    InvalidArgument {
        /// Description of the offending argument.
        message: String,
    },

    /// The inbound request is malformed.
    #[error("{message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// The requested scope was rejected.
    #[error("{message}")]
    InvalidScope {
        /// Description of why the scope is invalid.
        message: String,
    },

    /// The server reached a state that indicates a caller-side logic bug,
    /// e.g. an ID token requested without a resource owner.
    #[error("{message}")]
    Server {
        /// Description of the server error.
        message: String,
    },

    /// Signing failed in the cryptographic layer.
    #[error(transparent)]
    Signing(#[from] JwtError),
}

impl AuthError {
    /// Creates a new `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidScope` error.
    #[must_use]
    pub fn invalid_scope(message: impl Into<String>) -> Self {
        Self::InvalidScope {
            message: message.into(),
        }
    }

    /// Creates a new `Server` error.
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    /// Shorthand for the ``Missing parameter: `name` `` argument error.
    #[must_use]
    pub fn missing_parameter(name: &str) -> Self {
        Self::invalid_argument(format!("Missing parameter: `{name}`"))
    }

    /// Shorthand for the ``Invalid parameter: `name` `` argument error.
    #[must_use]
    pub fn invalid_parameter(name: &str) -> Self {
        Self::invalid_argument(format!("Invalid parameter: `{name}`"))
    }

    /// Returns `true` if the caller sent something the server rejects (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. } | Self::InvalidScope { .. })
    }

    /// Returns `true` if the failure lies on the server side (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. } => ErrorCategory::Configuration,
            Self::InvalidRequest { .. } => ErrorCategory::Validation,
            Self::InvalidScope { .. } => ErrorCategory::Authorization,
            Self::Server { .. } => ErrorCategory::Internal,
            Self::Signing(_) => ErrorCategory::Signing,
        }
    }

    /// Returns the OAuth 2.0 style error code for this error.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::InvalidScope { .. } => "invalid_scope",
            Self::Server { .. } => "server_error",
            Self::Signing(_) => "server_error",
        }
    }

    /// Returns the HTTP status code a token endpoint should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument { .. } => 500,
            Self::InvalidRequest { .. } => 400,
            Self::InvalidScope { .. } => 400,
            Self::Server { .. } => 503,
            Self::Signing(_) => 500,
        }
    }
}

/// Categories of issuance errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing or malformed configuration and arguments.
    Configuration,
    /// Request validation errors.
    Validation,
    /// Scope rejections.
    Authorization,
    /// Internal server errors.
    Internal,
    /// Cryptographic signing errors.
    Signing,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Validation => write!(f, "validation"),
            Self::Authorization => write!(f, "authorization"),
            Self::Internal => write!(f, "internal"),
            Self::Signing => write!(f, "signing"),
        }
    }
}
