//! Resolver configuration
//!
//! Plain serde structures so hosts can embed them in their own configuration
//! files. The CLI layers them from a file, the environment and flags.

use serde::{Deserialize, Serialize};

/// Configuration for an HTTP-backed [`CertManager`](crate::cert::CertManager)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Issuer root URL, e.g. `https://sso.example.com/realms`
    ///
    /// Realms are appended as a path segment. A trailing `/` is trimmed.
    pub base_path: String,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpClientConfig,
}

impl ResolverConfig {
    /// Configuration for `base_path` with default HTTP settings
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            http: HttpClientConfig::default(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/realms")
    }
}

/// Settings for the built-in [`ReqwestHttpClient`](crate::http::ReqwestHttpClient)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Whole-request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// `User-Agent` header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Follow HTTP redirects
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
            follow_redirects: default_follow_redirects(),
        }
    }
}

fn default_user_agent() -> String {
    format!("openid-decode/{}", env!("CARGO_PKG_VERSION"))
}

fn default_follow_redirects() -> bool {
    true
}
