//! Error types for key resolution and token verification
//!
//! Every failure in this crate surfaces as a [`DecodeError`]. Nothing is
//! recovered locally: the first error aborts the operation and is handed back
//! to the caller.
//!
//! Three display strings are relied upon by downstream string matching and
//! must not change:
//!
//! - `error get configuration. Response code: {code}. Url: {url}`
//! - `error get keys. Response code: {code}. Url: {url}`
//! - `unexpected signing method: {alg}`
//!
//! plus the segment-count detail carried by [`DecodeError::MalformedToken`],
//! see [`INVALID_SEGMENTS`].

use thiserror::Error;

/// Detail carried by [`DecodeError::MalformedToken`] when a token does not
/// have exactly three `.`-separated segments.
pub const INVALID_SEGMENTS: &str = "token contains an invalid number of segments";

/// Boxed error produced by an [`HttpClient`](crate::http::HttpClient) implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Transport failure reported by the HTTP capability
///
/// Displays exactly the message of the wrapped error so callers see what the
/// HTTP client said, untouched.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(BoxError);

impl TransportError {
    /// Wrap any error (or message) as a transport failure
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(err.into())
    }

    /// Borrow the underlying error
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Consume the wrapper and return the underlying error
    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Errors returned by [`KeyResolver`](crate::cert::KeyResolver) and
/// [`JwtDecoder`](crate::jwt::JwtDecoder)
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The HTTP client failed; the message is passed through unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The discovery endpoint answered with a non-2xx status
    #[error("error get configuration. Response code: {status}. Url: {url}")]
    DiscoveryHttp {
        /// HTTP status code
        status: u16,
        /// Discovery URL that was requested
        url: String,
    },

    /// The discovery body was not JSON or lacked `jwks_uri`
    #[error("invalid discovery document: {0}")]
    DiscoveryDecode(#[source] serde_json::Error),

    /// The JWKS endpoint answered with a non-2xx status
    #[error("error get keys. Response code: {status}. Url: {url}")]
    JwksHttp {
        /// HTTP status code
        status: u16,
        /// JWKS URL that was requested
        url: String,
    },

    /// The JWKS body was not a valid key set
    #[error("invalid JWKS document: {0}")]
    JwksDecode(#[source] serde_json::Error),

    /// No key with the requested `kid`, or the matching key had an empty exponent
    #[error("no key found for kid '{0}'")]
    KeyNotFound(String),

    /// `n` or `e` of a JWK was not base64url without padding
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(#[from] base64::DecodeError),

    /// The token could not be split or its header could not be read
    #[error("{0}")]
    MalformedToken(String),

    /// The token header declares an algorithm outside RS256/RS384/RS512
    #[error("unexpected signing method: {0}")]
    UnexpectedSigningMethod(String),

    /// The signature does not verify against the resolved key
    #[error("signature is invalid")]
    InvalidSignature,

    /// `exp` is in the past
    #[error("token is expired")]
    TokenExpired,

    /// `nbf` is in the future
    #[error("token is not valid yet")]
    TokenNotYetValid,

    /// A typed claims sink rejected the claims object
    #[error("invalid claims: {0}")]
    ClaimValidation(String),
}

impl DecodeError {
    /// Shorthand for a [`DecodeError::MalformedToken`] with the given detail
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedToken(detail.into())
    }

    /// Shorthand for a [`DecodeError::Transport`] wrapping the given error
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(TransportError::new(err))
    }

    /// Whether the error originated in the HTTP layer (transport or status)
    pub fn is_http(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::DiscoveryHttp { .. } | Self::JwksHttp { .. }
        )
    }

    /// HTTP status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::DiscoveryHttp { status, .. } | Self::JwksHttp { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, DecodeError>;
