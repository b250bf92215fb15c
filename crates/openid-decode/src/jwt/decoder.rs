//! Compact-serialized token verification

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{ClaimsSink, SigningMethod};
use crate::cert::KeyResolver;
use crate::error::{DecodeError, INVALID_SEGMENTS, Result};

/// JOSE header of a signed token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Declared signing algorithm
    pub alg: String,

    /// Key id used to select the verification key
    pub kid: String,

    /// Media type, usually `"JWT"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    /// Any other header parameters
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A verified token
///
/// Claims live in the sink passed to [`JwtDecoder::decode`]. Failures are
/// returned as errors, so `valid` is always `true` on a value obtained from
/// the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedToken {
    /// The token exactly as passed in
    pub raw: String,
    /// Decoded header
    pub header: TokenHeader,
    /// Raw signature bytes
    pub signature: Vec<u8>,
    /// Signing method the token was verified with
    pub method: SigningMethod,
    /// Verification outcome
    pub valid: bool,
}

/// Verifies a token for a realm and fills a claims sink
///
/// The seam callers depend on when they want to substitute the verifier.
/// [`JwtDecoder`] is the implementation backed by a [`KeyResolver`].
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token` for `realm`, filling `claims`
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`] of the verification, see [`JwtDecoder::decode`]
    async fn decode(
        &self,
        token: &str,
        realm: &str,
        claims: &mut (dyn ClaimsSink + Send),
    ) -> Result<ParsedToken>;
}

/// Verifies tokens against keys from a [`KeyResolver`]
///
/// Stateless apart from the resolver, so one decoder can be shared freely.
///
/// # Example
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use openid_decode::{CertManager, JwtDecoder, MapClaims, ResolverConfig};
/// # tokio_test::block_on(async {
/// let resolver = CertManager::from_config(&ResolverConfig::new("https://sso.example.com/realms"))?;
/// let decoder = JwtDecoder::new(Arc::new(resolver));
///
/// let mut claims = MapClaims::new();
/// let token = decoder.decode("eyJhbGciOi...", "master", &mut claims).await?;
/// println!("{} signed by {}", token.method, token.header.kid);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
#[derive(Clone)]
pub struct JwtDecoder {
    resolver: Arc<dyn KeyResolver>,
}

impl JwtDecoder {
    /// Create a decoder resolving keys through `resolver`
    pub fn new(resolver: Arc<dyn KeyResolver>) -> Self {
        Self { resolver }
    }

    /// Verify `token` for `realm` and fill `claims`
    ///
    /// Order of checks: segment count, header, key resolution, algorithm
    /// whitelist, claims decoding, signature, then `exp`/`nbf` against the
    /// current UTC time with no leeway.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::MalformedToken`] for a wrong segment count or an
    ///   unreadable header or claims segment
    /// - any error of [`KeyResolver::resolve`], unchanged
    /// - [`DecodeError::UnexpectedSigningMethod`] if `alg` is not RS256/384/512
    /// - [`DecodeError::ClaimValidation`] if the sink rejects the claims
    /// - [`DecodeError::InvalidSignature`] if verification fails
    /// - [`DecodeError::TokenExpired`] / [`DecodeError::TokenNotYetValid`]
    pub async fn decode<S>(&self, token: &str, realm: &str, claims: &mut S) -> Result<ParsedToken>
    where
        S: ClaimsSink + ?Sized,
    {
        let (header_segment, claims_segment, signature_segment) = split_token(token)?;
        let header = decode_header(header_segment)?;

        let key = self.resolver.resolve(&header.kid, realm).await?;

        let method = SigningMethod::from_alg(&header.alg).inspect_err(|_| {
            warn!(alg = %header.alg, kid = %header.kid, "Rejected token signing method");
        })?;

        let claims_map = decode_claims(claims_segment)?;
        let window = TimeWindow::from_claims(&claims_map)?;
        claims.fill(claims_map)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_segment)
            .map_err(|_| DecodeError::InvalidSignature)?;
        let signing_input = &token[..header_segment.len() + 1 + claims_segment.len()];
        method
            .verify(&key, signing_input.as_bytes(), &signature)
            .inspect_err(|_| debug!(kid = %header.kid, alg = %method, "Token signature rejected"))?;

        window.check(chrono::Utc::now().timestamp())?;

        debug!(kid = %header.kid, alg = %method, realm = realm, "Token verified");

        Ok(ParsedToken {
            raw: token.to_string(),
            header,
            signature,
            method,
            valid: true,
        })
    }
}

#[async_trait]
impl TokenVerifier for JwtDecoder {
    async fn decode(
        &self,
        token: &str,
        realm: &str,
        claims: &mut (dyn ClaimsSink + Send),
    ) -> Result<ParsedToken> {
        JwtDecoder::decode(self, token, realm, claims).await
    }
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder").finish_non_exhaustive()
    }
}

fn split_token(token: &str) -> Result<(&str, &str, &str)> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(claims), Some(signature), None) => Ok((header, claims, signature)),
        _ => Err(DecodeError::malformed(INVALID_SEGMENTS)),
    }
}

fn decode_header(segment: &str) -> Result<TokenHeader> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| DecodeError::malformed(format!("invalid token header encoding: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| DecodeError::malformed(format!("invalid token header: {e}")))
}

fn decode_claims(segment: &str) -> Result<Map<String, Value>> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| DecodeError::malformed(format!("invalid token claims encoding: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| DecodeError::malformed(format!("invalid token claims: {e}")))
}

/// `exp` / `nbf` bounds read from the claims
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct TimeWindow {
    exp: Option<f64>,
    nbf: Option<f64>,
}

impl TimeWindow {
    fn from_claims(claims: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            exp: numeric_claim(claims, "exp")?,
            nbf: numeric_claim(claims, "nbf")?,
        })
    }

    fn check(&self, now: i64) -> Result<()> {
        let now = now as f64;
        if let Some(exp) = self.exp
            && now >= exp
        {
            return Err(DecodeError::TokenExpired);
        }
        if let Some(nbf) = self.nbf
            && now < nbf
        {
            return Err(DecodeError::TokenNotYetValid);
        }
        Ok(())
    }
}

fn numeric_claim(claims: &Map<String, Value>, name: &str) -> Result<Option<f64>> {
    match claims.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| DecodeError::malformed(format!("claim '{name}' must be a number"))),
    }
}
