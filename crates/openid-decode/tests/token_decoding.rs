//! Token verification tests against a stand-in key resolver
//!
//! Tests cover:
//! - Successful RS256/RS384/RS512 verification with claims extraction
//! - Resolver errors passed through unchanged
//! - Malformed tokens and the `alg` whitelist
//! - Signature mismatch and `exp`/`nbf` enforcement
//! - Typed claims sinks

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{
    MockResolver, OTHER_KEY, SIGNING_KEY, generate_invalid_token, generate_token,
    generate_token_none, sign_token, signing_string, test_claims,
};
use openid_decode::{
    DecodeError, JwtDecoder, MapClaims, SigningMethod, StandardClaims, TokenVerifier,
    TypedClaims,
};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;

fn decoder(resolver: MockResolver) -> JwtDecoder {
    JwtDecoder::new(Arc::new(resolver))
}

fn decoder_with_signing_key() -> JwtDecoder {
    decoder(MockResolver::returning(SIGNING_KEY.to_public_key()))
}

#[tokio::test]
async fn test_decode_success() {
    let token = generate_token("Can be anything", 60);
    let mut claims = MapClaims::new();

    let parsed = decoder_with_signing_key()
        .decode(&token, "test", &mut claims)
        .await
        .expect("token should verify");

    assert_eq!(parsed.raw, token);
    assert!(parsed.valid);
    assert_eq!(parsed.method, SigningMethod::Rs256);
    assert_eq!(parsed.header.kid, "kid");
    assert_eq!(parsed.header.typ.as_deref(), Some("JWT"));
    assert_eq!(claims.get_str("dat"), Some("Can be anything"));
}

#[tokio::test]
async fn test_decode_passes_kid_and_realm_to_resolver() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let key = SIGNING_KEY.to_public_key();

    let resolver = MockResolver {
        cert: Box::new(move |kid: &str, realm: &str| {
            assert_eq!((kid, realm), ("kid", "tenant-a"));
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(openid_decode::Cert::default())
        }),
        public_key: Box::new(move |_: &openid_decode::Cert| Ok(key.clone())),
    };

    let token = generate_token("x", 60);
    decoder(resolver)
        .decode(&token, "tenant-a", &mut MapClaims::new())
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_decode_every_rsa_hash() {
    let decoder = decoder_with_signing_key();

    for (alg, method) in [
        ("RS256", SigningMethod::Rs256),
        ("RS384", SigningMethod::Rs384),
        ("RS512", SigningMethod::Rs512),
    ] {
        let token = sign_token(&SIGNING_KEY, alg, "kid", &test_claims("hash", 60));
        let parsed = decoder
            .decode(&token, "test", &mut MapClaims::new())
            .await
            .unwrap_or_else(|e| panic!("{alg} should verify: {e}"));
        assert_eq!(parsed.method, method);
    }
}

#[tokio::test]
async fn test_decode_error_get_cert() {
    let resolver = MockResolver {
        cert: Box::new(|_: &str, _: &str| Err(DecodeError::transport("error cert"))),
        public_key: Box::new(|_: &openid_decode::Cert| {
            Err(DecodeError::transport("public key requested without a cert"))
        }),
    };

    let err = decoder(resolver)
        .decode(&generate_token("Can be anything", 60), "test", &mut MapClaims::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "error cert");
}

#[tokio::test]
async fn test_decode_error_get_public_key() {
    let resolver = MockResolver {
        cert: Box::new(|kid: &str, _: &str| {
            Ok(openid_decode::Cert {
                kid: kid.to_string(),
                ..Default::default()
            })
        }),
        public_key: Box::new(|_: &openid_decode::Cert| {
            Err(DecodeError::transport("error public key"))
        }),
    };

    let err = decoder(resolver)
        .decode(&generate_token("Can be anything", 60), "test", &mut MapClaims::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "error public key");
}

#[tokio::test]
async fn test_decode_invalid_number_of_segments() {
    let err = decoder_with_signing_key()
        .decode(&generate_invalid_token("Can be anything"), "test", &mut MapClaims::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DecodeError::MalformedToken(_)));
    assert_eq!(err.to_string(), "token contains an invalid number of segments");
}

#[tokio::test]
async fn test_decode_rejects_alg_none() {
    let mut claims = MapClaims::new();
    let err = decoder_with_signing_key()
        .decode(&generate_token_none("Can be anything", 60), "test", &mut claims)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "unexpected signing method: none");
    assert!(claims.is_empty(), "claims must not be filled for a rejected alg");
}

#[tokio::test]
async fn test_decode_rejects_non_rsa_algorithms_regardless_of_signature() {
    let decoder = decoder_with_signing_key();

    for alg in ["HS256", "ES256", "PS256", "EdDSA"] {
        let header = json!({"typ": "JWT", "alg": alg, "kid": "kid"});
        let token = format!("{}.c2lnbmF0dXJl", signing_string(&header, &test_claims("x", 60)));

        let err = decoder
            .decode(&token, "test", &mut MapClaims::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("unexpected signing method: {alg}"));
    }
}

#[tokio::test]
async fn test_decode_header_missing_kid() {
    let header = json!({"typ": "JWT", "alg": "RS256"});
    let token = format!("{}.sig", signing_string(&header, &test_claims("x", 60)));

    let err = decoder_with_signing_key()
        .decode(&token, "test", &mut MapClaims::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DecodeError::MalformedToken(_)));
}

#[tokio::test]
async fn test_decode_wrong_key_is_invalid_signature() {
    let token = sign_token(&OTHER_KEY, "RS256", "kid", &test_claims("x", 60));

    let err = decoder_with_signing_key()
        .decode(&token, "test", &mut MapClaims::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DecodeError::InvalidSignature));
}

#[tokio::test]
async fn test_decode_tampered_claims_is_invalid_signature() {
    let token = generate_token("original", 60);
    let parts: Vec<&str> = token.split('.').collect();
    let forged = signing_string(
        &json!({"typ": "JWT", "alg": "RS256", "kid": "kid"}),
        &test_claims("forged", 60),
    );
    let forged_claims = forged.split('.').nth(1).unwrap();
    let tampered = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

    let err = decoder_with_signing_key()
        .decode(&tampered, "test", &mut MapClaims::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DecodeError::InvalidSignature));
}

#[tokio::test]
async fn test_decode_expired() {
    let token = generate_token("late", -60);

    let err = decoder_with_signing_key()
        .decode(&token, "test", &mut MapClaims::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DecodeError::TokenExpired));
}

#[tokio::test]
async fn test_decode_not_yet_valid() {
    let now = common::current_timestamp();
    let claims = json!({"dat": "early", "exp": now + 3600, "nbf": now + 600});
    let token = sign_token(&SIGNING_KEY, "RS256", "kid", &claims);

    let err = decoder_with_signing_key()
        .decode(&token, "test", &mut MapClaims::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DecodeError::TokenNotYetValid));
}

#[tokio::test]
async fn test_decode_without_temporal_claims() {
    let token = sign_token(&SIGNING_KEY, "RS256", "kid", &json!({"sub": "svc"}));
    let mut claims = MapClaims::new();

    decoder_with_signing_key()
        .decode(&token, "test", &mut claims)
        .await
        .unwrap();

    assert_eq!(claims.get_str("sub"), Some("svc"));
}

#[derive(Debug, Deserialize, PartialEq)]
struct DataClaims {
    dat: String,
}

#[tokio::test]
async fn test_decode_into_typed_claims() {
    let token = generate_token("Can be anything", 60);
    let mut claims = TypedClaims::<DataClaims>::new();

    decoder_with_signing_key()
        .decode(&token, "test", &mut claims)
        .await
        .unwrap();

    assert_eq!(claims.get().map(|c| c.dat.as_str()), Some("Can be anything"));
}

#[tokio::test]
async fn test_decode_typed_claims_missing_required() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct NeedsEmail {
        email: String,
    }

    let token = generate_token("Can be anything", 60);
    let err = decoder_with_signing_key()
        .decode(&token, "test", &mut TypedClaims::<NeedsEmail>::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DecodeError::ClaimValidation(_)));
}

#[tokio::test]
async fn test_decode_into_standard_claims() {
    let now = common::current_timestamp();
    let claims = json!({
        "iss": "https://sso.example.com/realms/test",
        "sub": "f3c1",
        "exp": now + 60,
        "preferred_username": "alice"
    });
    let token = sign_token(&SIGNING_KEY, "RS512", "kid", &claims);
    let mut sink = TypedClaims::<StandardClaims>::new();

    decoder_with_signing_key()
        .decode(&token, "test", &mut sink)
        .await
        .unwrap();

    let standard = sink.into_inner().unwrap();
    assert_eq!(standard.sub.as_deref(), Some("f3c1"));
    assert_eq!(standard.additional["preferred_username"], json!("alice"));
}

#[tokio::test]
async fn test_decoder_behind_verifier_trait_object() {
    let verifier: Arc<dyn TokenVerifier> = Arc::new(decoder_with_signing_key());
    let mut claims = MapClaims::new();

    let parsed = verifier
        .decode(&generate_token("via trait", 60), "test", &mut claims)
        .await
        .unwrap();
    assert_eq!(parsed.method, SigningMethod::Rs256);
    assert_eq!(claims.get_str("dat"), Some("via trait"));

    let mut typed = TypedClaims::<DataClaims>::new();
    let err = verifier
        .decode(&generate_token_none("x", 60), "test", &mut typed)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "unexpected signing method: none");
    assert!(typed.get().is_none());
}
