//! HTTP-backed key resolver with a per-instance key cache

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use rsa::RsaPublicKey;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{Cert, JwkSet, KeyResolver};
use crate::config::ResolverConfig;
use crate::error::{DecodeError, Result};
use crate::http::{HttpClient, HttpResponse, ReqwestHttpClient};

/// OpenID Connect discovery document
///
/// Only `jwks_uri` is consumed; every other field is ignored.
#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    jwks_uri: String,
}

/// Resolves signing keys through a realm's discovery document and JWKS
///
/// Keys are cached by `kid` for the lifetime of the manager. There is no TTL
/// and no refresh: a key rotated in after the first lookup of its `kid` is
/// never seen by this instance.
///
/// # Example
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use openid_decode::cert::{CertManager, KeyResolver};
/// # use openid_decode::http::ReqwestHttpClient;
/// # tokio_test::block_on(async {
/// let manager = CertManager::new(
///     "https://sso.example.com/realms",
///     Arc::new(ReqwestHttpClient::new()?),
/// );
///
/// let key = manager.resolve("1h_MHweQR-g8osNYJvhd-FZ4s2lJ52PRm0G68jsuLPc", "master").await?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
pub struct CertManager {
    base_path: String,
    http_client: Arc<dyn HttpClient>,
    cache: RwLock<HashMap<String, Cert>>,
}

impl CertManager {
    /// Create a manager for the issuer root `base_path`
    ///
    /// Trailing `/` characters are trimmed from `base_path`.
    pub fn new(base_path: impl AsRef<str>, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            base_path: base_path.as_ref().trim_end_matches('/').to_string(),
            http_client,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Create a manager backed by [`ReqwestHttpClient`]
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Transport`] if the HTTP client cannot be built
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let http_client = ReqwestHttpClient::with_config(&config.http)?;
        Ok(Self::new(&config.base_path, Arc::new(http_client)))
    }

    /// Issuer root URL with trailing `/` removed
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Number of keys currently cached
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    /// Discovery URL for `realm`
    ///
    /// Plain concatenation: neither part is escaped or validated.
    pub fn discovery_url(&self, realm: &str) -> String {
        format!("{}/{}/.well-known/openid-configuration", self.base_path, realm)
    }

    async fn fetch_jwks_uri(&self, realm: &str) -> Result<String> {
        let url = self.discovery_url(realm);
        debug!(url = %url, "Fetching OIDC discovery document");

        let response = self.http_client.get(&url).await?;
        if !response.is_success() {
            warn!(
                url = %url,
                status = response.status,
                "Discovery endpoint returned error status"
            );
            return Err(DecodeError::DiscoveryHttp {
                status: response.status,
                url,
            });
        }

        let doc: DiscoveryDocument =
            parse_body(&response).map_err(DecodeError::DiscoveryDecode)?;
        Ok(doc.jwks_uri)
    }

    async fn fetch_jwks(&self, jwks_uri: &str) -> Result<JwkSet> {
        debug!(jwks_uri = %jwks_uri, "Fetching JWKS");

        let response = self.http_client.get(jwks_uri).await?;
        if !response.is_success() {
            warn!(
                jwks_uri = %jwks_uri,
                status = response.status,
                "JWKS endpoint returned error status"
            );
            return Err(DecodeError::JwksHttp {
                status: response.status,
                url: jwks_uri.to_string(),
            });
        }

        parse_body(&response).map_err(DecodeError::JwksDecode)
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(
    response: &HttpResponse,
) -> std::result::Result<T, serde_json::Error> {
    serde_json::from_slice(&response.body)
}

impl std::fmt::Debug for CertManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertManager")
            .field("base_path", &self.base_path)
            .field("cached_keys", &self.cached_len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyResolver for CertManager {
    async fn fetch_cert(&self, kid: &str, realm: &str) -> Result<Cert> {
        let jwks_uri = self.fetch_jwks_uri(realm).await?;
        let jwks = self.fetch_jwks(&jwks_uri).await?;

        match jwks.find(kid) {
            Some(cert) if cert.has_exponent() => {
                info!(
                    kid = kid,
                    realm = realm,
                    key_count = jwks.keys.len(),
                    "Resolved signing key"
                );
                Ok(cert.clone())
            }
            _ => {
                warn!(
                    kid = kid,
                    realm = realm,
                    jwks_uri = %jwks_uri,
                    "Key ID not found in JWKS"
                );
                Err(DecodeError::KeyNotFound(kid.to_string()))
            }
        }
    }

    async fn resolve(&self, kid: &str, realm: &str) -> Result<RsaPublicKey> {
        let cached = self.cache.read().get(kid).cloned();
        if let Some(cert) = cached {
            debug!(kid = kid, "Using cached signing key");
            return self.public_key(&cert);
        }

        // Lock released while fetching; concurrent misses for the same kid
        // both fetch and the first insert wins.
        let fetched = self.fetch_cert(kid, realm).await?;
        let cert = self
            .cache
            .write()
            .entry(kid.to_string())
            .or_insert(fetched)
            .clone();

        self.public_key(&cert)
    }
}
