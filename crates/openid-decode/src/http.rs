//! HTTP capability used by the key resolver
//!
//! The resolver never talks to the network directly. It asks an
//! [`HttpClient`] to perform a GET and hand back the status, headers and the
//! fully-read body. Tests substitute their own implementation here; production
//! code uses [`ReqwestHttpClient`].
//!
//! Timeouts, redirects, TLS and connection pooling are the capability's
//! concern. Nothing is bounded by default: callers who need a deadline
//! configure one on the client (see [`HttpClientConfig`]).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderMap;

use crate::config::HttpClientConfig;
use crate::error::TransportError;

/// Response returned by an [`HttpClient`]
///
/// The body is read to completion by the client, so no connection state
/// outlives the call regardless of how the caller uses the response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Build a response with an empty header map
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status is in `200..=299`
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Capability to perform an HTTP GET
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` and return the response, or the transport failure
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for std::sync::Arc<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url).await
    }
}

/// [`HttpClient`] backed by `reqwest` with rustls
#[derive(Clone)]
pub struct ReqwestHttpClient {
    inner: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client with default settings: no timeout, redirects followed
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialised
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&HttpClientConfig::default())
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialised
    pub fn with_config(config: &HttpClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        Ok(Self {
            inner: builder.build()?,
        })
    }

    /// Create from an existing reqwest client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl std::fmt::Debug for ReqwestHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestHttpClient")
            .field("inner", &"<reqwest::Client>")
            .finish()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self.inner.get(url).send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
