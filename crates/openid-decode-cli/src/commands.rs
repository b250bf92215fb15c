//! Command implementations
//!
//! Each command returns the JSON value to print so it can be tested without
//! capturing stdout.

use openid_decode::{KeyResolver, MapClaims, TokenVerifier};
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{CliError, CliResult};

/// Fetch the JWK for `kid` in `realm`
///
/// Goes straight to the provider; the key cache is not consulted.
///
/// # Errors
///
/// Any key resolution error, see [`KeyResolver::fetch_cert`]
pub async fn cert(resolver: &dyn KeyResolver, kid: &str, realm: &str) -> CliResult<Value> {
    let cert = resolver.fetch_cert(kid, realm).await?;
    Ok(serde_json::to_value(cert)?)
}

/// Verify `token` for `realm` and describe it
///
/// Output shape: `{ "alg": ..., "kid": ..., "claims": { ... } }`.
///
/// # Errors
///
/// Any verification error, see [`TokenVerifier::decode`]
pub async fn decode(verifier: &dyn TokenVerifier, token: &str, realm: &str) -> CliResult<Value> {
    let mut claims = MapClaims::new();
    let parsed = verifier.decode(token, realm, &mut claims).await?;

    Ok(json!({
        "alg": parsed.method.as_str(),
        "kid": parsed.header.kid,
        "claims": Value::Object(claims.into_inner()),
    }))
}

/// The token argument as given, or read from `input` when it is `-`
///
/// Surrounding whitespace (a trailing newline from `echo`) is removed.
///
/// # Errors
///
/// [`CliError::Io`] if reading fails, [`CliError::InvalidArguments`] if the
/// token is empty
pub async fn read_token<R>(arg: &str, input: &mut R) -> CliResult<String>
where
    R: AsyncRead + Unpin,
{
    let token = if arg == "-" {
        let mut buf = String::new();
        input.read_to_string(&mut buf).await?;
        buf
    } else {
        arg.to_string()
    };

    let token = token.trim();
    if token.is_empty() {
        return Err(CliError::InvalidArguments("token is empty".into()));
    }
    Ok(token.to_string())
}
