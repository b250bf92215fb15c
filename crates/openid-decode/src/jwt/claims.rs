//! Claims sinks
//!
//! The verifier does not decide how claims are represented. It hands the
//! decoded claims object to a [`ClaimsSink`], which keeps whatever it wants.
//!
//! - [`MapClaims`] keeps every top-level claim in a string-keyed map.
//! - [`TypedClaims`] binds the claims into any `serde` type, discarding unknown
//!   claims and rejecting missing required ones.
//!
//! Callers can implement [`ClaimsSink`] for their own receptacles.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DecodeError, Result};

/// Receptacle the verifier fills with decoded claims
pub trait ClaimsSink {
    /// Populate the sink from the token's claims object
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ClaimValidation`] if the claims do not fit the
    /// sink's shape.
    fn fill(&mut self, claims: Map<String, Value>) -> Result<()>;
}

/// Generic sink holding every top-level claim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapClaims(pub Map<String, Value>);

impl MapClaims {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// String value of claim `name`, if present and a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Consume the sink and return the claims map
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Deref for MapClaims {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MapClaims {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ClaimsSink for MapClaims {
    fn fill(&mut self, claims: Map<String, Value>) -> Result<()> {
        self.0.extend(claims);
        Ok(())
    }
}

impl ClaimsSink for HashMap<String, Value> {
    fn fill(&mut self, claims: Map<String, Value>) -> Result<()> {
        self.extend(claims);
        Ok(())
    }
}

/// Schema-driven sink binding claims into `T`
///
/// Unknown claims are discarded unless `T` asks for them (e.g. with
/// `#[serde(flatten)]`). Missing or mistyped required claims fail with
/// [`DecodeError::ClaimValidation`].
#[derive(Debug, Clone)]
pub struct TypedClaims<T> {
    value: Option<T>,
}

impl<T> TypedClaims<T> {
    /// Empty sink
    pub fn new() -> Self {
        Self { value: None }
    }

    /// The bound claims, once filled
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consume the sink and return the bound claims, once filled
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for TypedClaims<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> ClaimsSink for TypedClaims<T> {
    fn fill(&mut self, claims: Map<String, Value>) -> Result<()> {
        let value = serde_json::from_value(Value::Object(claims))
            .map_err(|e| DecodeError::ClaimValidation(e.to_string()))?;
        self.value = Some(value);
        Ok(())
    }
}

/// Registered claims per RFC 7519 Section 4.1
///
/// Claims outside the registered set are kept in `additional`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StandardClaims {
    /// Issuer (iss) - identifies who issued the token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject (sub) - identifies the principal (user ID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Audience (aud) - a single string or an array of strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Value>,

    /// Expiration Time (exp) - Unix timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Not Before (nbf) - Unix timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issued At (iat) - Unix timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// JWT ID (jti)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Additional claims not in RFC 7519
    #[serde(flatten)]
    pub additional: HashMap<String, Value>,
}
