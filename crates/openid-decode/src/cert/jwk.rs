//! JWK model and JWK → RSA public key conversion

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// One key advertised by a JWKS endpoint
///
/// Only RSA keys are meaningful here. `x5t` and `x5c` are carried through for
/// callers but never used for verification. Fields the provider adds beyond
/// these are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cert {
    /// Key type, `"RSA"`
    #[serde(default, deserialize_with = "null_as_default")]
    pub kty: String,

    /// Intended use, usually `"sig"`
    #[serde(default, rename = "use", deserialize_with = "null_as_default")]
    pub use_: String,

    /// Key id
    #[serde(default, deserialize_with = "null_as_default")]
    pub kid: String,

    /// X.509 certificate SHA-1 thumbprint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x5t: Option<String>,

    /// Modulus, base64url without padding, big-endian
    #[serde(default, deserialize_with = "null_as_default")]
    pub n: String,

    /// Public exponent, base64url without padding, big-endian
    #[serde(default, deserialize_with = "null_as_default")]
    pub e: String,

    /// X.509 certificate chain (standard base64 DER)
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub x5c: Vec<String>,
}

impl Cert {
    /// Encode an RSA public key as a signing JWK with the given `kid`
    pub fn from_public_key(kid: impl Into<String>, key: &RsaPublicKey) -> Self {
        Self {
            kty: "RSA".to_string(),
            use_: "sig".to_string(),
            kid: kid.into(),
            n: URL_SAFE_NO_PAD.encode(key.n().to_bytes_be()),
            e: URL_SAFE_NO_PAD.encode(key.e().to_bytes_be()),
            ..Self::default()
        }
    }

    /// Whether the key carries an exponent at all
    ///
    /// A key without one is treated as absent by the resolver.
    pub fn has_exponent(&self) -> bool {
        !self.e.is_empty()
    }

    /// Decode `n` and `e` into an RSA public key
    ///
    /// The exponent is read as a fixed 8-byte big-endian integer: shorter
    /// encodings are left-padded with zeros, longer ones contribute only their
    /// first 8 bytes. No range check is applied to either component.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidKeyEncoding`](crate::DecodeError::InvalidKeyEncoding)
    /// if `n` or `e` is not base64url without padding.
    pub fn to_public_key(&self) -> Result<RsaPublicKey> {
        let n = URL_SAFE_NO_PAD.decode(&self.n)?;
        let e = URL_SAFE_NO_PAD.decode(&self.e)?;

        Ok(RsaPublicKey::new_unchecked(
            BigUint::from_bytes_be(&n),
            BigUint::from(exponent_from_be(&e)),
        ))
    }
}

/// A JSON `null` reads as the field's default, like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read up to 8 big-endian bytes as a `u64`
fn exponent_from_be(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    if bytes.len() < buf.len() {
        buf[8 - bytes.len()..].copy_from_slice(bytes);
    } else {
        buf.copy_from_slice(&bytes[..8]);
    }
    u64::from_be_bytes(buf)
}

/// JSON Web Key Set as served by a JWKS endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    /// Keys in document order
    pub keys: Vec<Cert>,
}

impl JwkSet {
    /// First key whose `kid` equals `kid`, in document order
    pub fn find(&self, kid: &str) -> Option<&Cert> {
        self.keys.iter().find(|cert| cert.kid == kid)
    }
}
