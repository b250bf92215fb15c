//! Signed token verification
//!
//! # Flow
//!
//! ```text
//! header.claims.signature
//!   │
//!   ├─ header ──► kid ──► KeyResolver::resolve(kid, realm) ──► RSA key
//!   │             alg ──► SigningMethod (RS256 / RS384 / RS512 only)
//!   ├─ claims ──► ClaimsSink::fill
//!   └─ signature ──► PKCS#1 v1.5 verify(header.claims) ──► exp / nbf
//! ```
//!
//! # Modules
//!
//! - `algorithm` - algorithm whitelist and signature verification
//! - `claims` - claims sinks (map, typed, RFC 7519 registered claims)
//! - `decoder` - the [`TokenVerifier`] seam and [`JwtDecoder`]

mod algorithm;
mod claims;
mod decoder;

pub use algorithm::SigningMethod;
pub use claims::{ClaimsSink, MapClaims, StandardClaims, TypedClaims};
pub use decoder::{JwtDecoder, ParsedToken, TokenHeader, TokenVerifier};
