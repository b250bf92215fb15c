//! Key resolution: realm + `kid` → RSA public key
//!
//! ```text
//! resolve(kid, realm)
//!   │
//!   ├─ cache hit ──────────────────────────────► public_key(cert)
//!   │
//!   └─ miss ─► GET {base}/{realm}/.well-known/openid-configuration
//!              │  jwks_uri
//!              └─► GET {jwks_uri} ─► first key with matching kid
//!                                     │
//!                                     └─► cache ─► public_key(cert)
//! ```
//!
//! [`KeyResolver`] is the seam the token verifier depends on. [`CertManager`]
//! is the HTTP-backed implementation.

mod jwk;
mod manager;

pub use jwk::{Cert, JwkSet};
pub use manager::CertManager;

use async_trait::async_trait;
use rsa::RsaPublicKey;

use crate::error::Result;

/// Maps a realm and key id to the issuer's public signing key
#[async_trait]
pub trait KeyResolver: Send + Sync {
    /// Fetch the JWK advertised under `kid` for `realm`
    ///
    /// # Errors
    ///
    /// Returns the transport, HTTP status or decode error of whichever request
    /// failed, or [`DecodeError::KeyNotFound`](crate::DecodeError::KeyNotFound)
    /// if no usable key matches.
    async fn fetch_cert(&self, kid: &str, realm: &str) -> Result<Cert>;

    /// Convert a JWK into an RSA public key
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidKeyEncoding`](crate::DecodeError::InvalidKeyEncoding)
    /// if `n` or `e` is not base64url.
    fn public_key(&self, cert: &Cert) -> Result<RsaPublicKey> {
        cert.to_public_key()
    }

    /// Resolve the public key for `kid` in `realm`
    ///
    /// The default fetches every time. Implementations that cache override it.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`fetch_cert`](Self::fetch_cert) or
    /// [`public_key`](Self::public_key).
    async fn resolve(&self, kid: &str, realm: &str) -> Result<RsaPublicKey> {
        let cert = self.fetch_cert(kid, realm).await?;
        self.public_key(&cert)
    }
}
