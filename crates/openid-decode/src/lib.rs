//! # openid-decode
//!
//! Verify bearer access tokens issued by an OpenID Connect provider.
//!
//! Given a compact-serialized signed token and a realm (tenant) name, the
//! crate reads the token header, resolves the issuer's RSA signing key through
//! the realm's discovery document and JWKS, verifies the signature and hands
//! the decoded claims to the caller.
//!
//! ## Architecture
//!
//! - [`cert`] - key resolution: discovery → JWKS → JWK → RSA public key, with
//!   a per-instance `kid` cache
//! - [`jwt`] - token parsing, RS256/RS384/RS512 whitelist, signature and
//!   `exp`/`nbf` checks, claims sinks
//! - [`http`] - the HTTP capability the resolver uses (swap it in tests)
//! - [`config`] - serde configuration for the built-in resolver
//! - [`error`] - the [`DecodeError`] taxonomy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use openid_decode::{CertManager, JwtDecoder, MapClaims, ResolverConfig};
//!
//! # tokio_test::block_on(async {
//! let resolver = CertManager::from_config(&ResolverConfig::new("https://sso.example.com/realms"))?;
//! let decoder = JwtDecoder::new(Arc::new(resolver));
//!
//! let mut claims = MapClaims::new();
//! decoder.decode("eyJhbGciOi...", "master", &mut claims).await?;
//!
//! if let Some(user) = claims.get_str("preferred_username") {
//!     println!("token for {user}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```
//!
//! ## Execution model
//!
//! Every operation runs on the caller's task. The crate spawns nothing and
//! sets no timeouts of its own; bound latency by configuring the HTTP client.
//! Logging goes through `tracing` and is silent unless the host installs a
//! subscriber.

pub mod cert;
pub mod config;
pub mod error;
pub mod http;
pub mod jwt;

#[doc(inline)]
pub use cert::{Cert, CertManager, JwkSet, KeyResolver};
#[doc(inline)]
pub use config::{HttpClientConfig, ResolverConfig};
#[doc(inline)]
pub use error::{DecodeError, Result, TransportError};
#[doc(inline)]
pub use http::{HttpClient, HttpResponse, ReqwestHttpClient};
#[doc(inline)]
pub use jwt::{
    ClaimsSink, JwtDecoder, MapClaims, ParsedToken, SigningMethod, StandardClaims, TokenHeader,
    TokenVerifier, TypedClaims,
};
