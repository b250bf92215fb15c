//! Common test utilities for integration tests
//!
//! Provides a wiremock-backed OpenID provider, RSA key material and helpers to
//! mint signed tokens.

#![allow(dead_code)]

use std::sync::LazyLock;
use std::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use openid_decode::{Cert, DecodeError, KeyResolver};
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{Value, json};
use sha2::{Sha256, Sha384, Sha512};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Shared 2048-bit signing key (generation is slow, do it once)
pub static SIGNING_KEY: LazyLock<RsaPrivateKey> = LazyLock::new(generate_key);

/// A second, unrelated key for signature-mismatch tests
pub static OTHER_KEY: LazyLock<RsaPrivateKey> = LazyLock::new(generate_key);

/// Generate a fresh RSA-2048 private key
pub fn generate_key() -> RsaPrivateKey {
    let mut rng = rand::thread_rng();
    RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate RSA key")
}

/// Get current Unix timestamp
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64
}

/// Claims carrying `dat` and valid for `ttl_secs` from now
pub fn test_claims(content: &str, ttl_secs: i64) -> Value {
    let now = current_timestamp();
    json!({
        "dat": content,
        "exp": now + ttl_secs,
        "iat": now,
        "nbf": now,
    })
}

fn encode_segment(value: &Value) -> String {
    URL_SAFE_NO_PAD.encode(value.to_string())
}

/// `base64url(header).base64url(claims)` without a signature
pub fn signing_string(header: &Value, claims: &Value) -> String {
    format!("{}.{}", encode_segment(header), encode_segment(claims))
}

/// Sign `claims` with `key` under `alg` (RS256/RS384/RS512) and `kid`
pub fn sign_token(key: &RsaPrivateKey, alg: &str, kid: &str, claims: &Value) -> String {
    let header = json!({"typ": "JWT", "alg": alg, "kid": kid});
    let input = signing_string(&header, claims);

    let signature = match alg {
        "RS256" => SigningKey::<Sha256>::new(key.clone()).sign(input.as_bytes()).to_vec(),
        "RS384" => SigningKey::<Sha384>::new(key.clone()).sign(input.as_bytes()).to_vec(),
        "RS512" => SigningKey::<Sha512>::new(key.clone()).sign(input.as_bytes()).to_vec(),
        other => panic!("Unsupported algorithm for test token: {other}"),
    };

    format!("{input}.{}", URL_SAFE_NO_PAD.encode(signature))
}

/// RS256 token for `kid` signed with [`SIGNING_KEY`]
pub fn generate_token(content: &str, ttl_secs: i64) -> String {
    sign_token(&SIGNING_KEY, "RS256", "kid", &test_claims(content, ttl_secs))
}

/// Unsigned token declaring `alg: none` (trailing empty signature segment)
pub fn generate_token_none(content: &str, ttl_secs: i64) -> String {
    let header = json!({"typ": "JWT", "alg": "none", "kid": "kid"});
    format!("{}.", signing_string(&header, &test_claims(content, ttl_secs)))
}

/// Header and claims only: two segments
pub fn generate_invalid_token(content: &str) -> String {
    let header = json!({"typ": "JWT", "kid": "kid"});
    signing_string(&header, &json!({ "dat": content }))
}

/// Resolver stand-in driven by closures
pub struct MockResolver {
    pub cert: Box<dyn Fn(&str, &str) -> Result<Cert, DecodeError> + Send + Sync>,
    pub public_key: Box<dyn Fn(&Cert) -> Result<RsaPublicKey, DecodeError> + Send + Sync>,
}

impl MockResolver {
    /// Always hands out `key`
    pub fn returning(key: RsaPublicKey) -> Self {
        Self {
            cert: Box::new(|kid: &str, _: &str| {
                Ok(Cert {
                    kid: kid.to_string(),
                    ..Cert::default()
                })
            }),
            public_key: Box::new(move |_: &Cert| Ok(key.clone())),
        }
    }
}

#[async_trait]
impl KeyResolver for MockResolver {
    async fn fetch_cert(&self, kid: &str, realm: &str) -> Result<Cert, DecodeError> {
        (self.cert)(kid, realm)
    }

    fn public_key(&self, cert: &Cert) -> Result<RsaPublicKey, DecodeError> {
        (self.public_key)(cert)
    }
}

/// Mock OpenID provider serving discovery and JWKS for one realm
pub struct MockOidcProvider {
    pub server: MockServer,
    pub base_path: String,
    pub realm: String,
}

impl MockOidcProvider {
    /// Start a provider for `realm`
    pub async fn start(realm: &str) -> Self {
        let server = MockServer::start().await;
        let base_path = format!("{}/realms", server.uri());

        Self {
            server,
            base_path,
            realm: realm.to_string(),
        }
    }

    pub fn discovery_path(&self) -> String {
        format!("/realms/{}/.well-known/openid-configuration", self.realm)
    }

    pub fn jwks_path(&self) -> String {
        format!("/realms/{}/protocol/openid-connect/certs", self.realm)
    }

    pub fn jwks_uri(&self) -> String {
        format!("{}{}", self.server.uri(), self.jwks_path())
    }

    /// Serve a Keycloak-style discovery document pointing at [`Self::jwks_uri`]
    pub async fn mock_discovery(&self, expected_calls: u64) {
        self.mock_discovery_delayed(Duration::ZERO, expected_calls).await;
    }

    /// Like [`Self::mock_discovery`], answering after `delay`
    pub async fn mock_discovery_delayed(&self, delay: Duration, expected_calls: u64) {
        let issuer = format!("{}/{}", self.base_path, self.realm);
        Mock::given(method("GET"))
            .and(path(self.discovery_path()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "issuer": issuer,
                        "jwks_uri": self.jwks_uri(),
                        "token_endpoint": format!("{issuer}/protocol/openid-connect/token"),
                    }))
                    .set_delay(delay),
            )
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Serve `keys` as the JWKS
    pub async fn mock_jwks(&self, keys: Vec<Value>, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(self.jwks_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": keys })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Answer `path` with a bare status
    pub async fn mock_status(&self, route: String, status: u16) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }
}

/// JWK JSON for `key` under `kid`
pub fn jwk(kid: &str, key: &RsaPrivateKey) -> Value {
    let mut value = serde_json::to_value(Cert::from_public_key(kid, &key.to_public_key()))
        .expect("Cert serializes");
    value["alg"] = json!("RS256");
    value
}
