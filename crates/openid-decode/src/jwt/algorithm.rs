//! RS256/RS384/RS512 whitelist and PKCS#1 v1.5 verification

use std::fmt;

use rsa::RsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};

use crate::error::{DecodeError, Result};

/// Signing methods accepted by the verifier
///
/// Only RSA PKCS#1 v1.5 with SHA-2. `none`, HMAC, ECDSA and RSA-PSS tokens are
/// rejected before any cryptographic work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningMethod {
    /// RSASSA-PKCS1-v1_5 using SHA-256
    #[serde(rename = "RS256")]
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    #[serde(rename = "RS384")]
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    #[serde(rename = "RS512")]
    Rs512,
}

impl SigningMethod {
    /// All accepted methods
    pub const ALL: [SigningMethod; 3] = [Self::Rs256, Self::Rs384, Self::Rs512];

    /// Look up the method for a header `alg` value
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedSigningMethod`] for anything outside
    /// `RS256`, `RS384` and `RS512`. Matching is case-sensitive.
    pub fn from_alg(alg: &str) -> Result<Self> {
        match alg {
            "RS256" => Ok(Self::Rs256),
            "RS384" => Ok(Self::Rs384),
            "RS512" => Ok(Self::Rs512),
            other => Err(DecodeError::UnexpectedSigningMethod(other.to_string())),
        }
    }

    /// The `alg` header value for this method
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
        }
    }

    /// Verify `signature` over `signing_input` with `key`
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidSignature`] if the signature is malformed
    /// or does not match.
    pub fn verify(&self, key: &RsaPublicKey, signing_input: &[u8], signature: &[u8]) -> Result<()> {
        let signature =
            Signature::try_from(signature).map_err(|_| DecodeError::InvalidSignature)?;

        let verified = match self {
            Self::Rs256 => {
                VerifyingKey::<Sha256>::new(key.clone()).verify(signing_input, &signature)
            }
            Self::Rs384 => {
                VerifyingKey::<Sha384>::new(key.clone()).verify(signing_input, &signature)
            }
            Self::Rs512 => {
                VerifyingKey::<Sha512>::new(key.clone()).verify(signing_input, &signature)
            }
        };

        verified.map_err(|_| DecodeError::InvalidSignature)
    }
}

impl fmt::Display for SigningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SigningMethod {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_alg(s)
    }
}
