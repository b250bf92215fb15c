//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI application structure
#[derive(Parser, Debug)]
#[command(
    name = "openid-decode",
    version,
    about = "Fetch realm signing keys and verify OpenID Connect access tokens",
    long_about = "openid-decode resolves a realm's signing keys through its OpenID Connect\n\
                  discovery document and JWKS, and verifies RS256/RS384/RS512 access tokens\n\
                  against them.\n\n\
                  Configuration is layered: --config file, then OPENID_DECODE_* environment\n\
                  variables (use __ for nesting, e.g. OPENID_DECODE_HTTP__TIMEOUT_SECS),\n\
                  then command-line flags."
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Flags shared by every subcommand
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Issuer root URL, e.g. https://sso.example.com/realms
    #[arg(long, global = true, env = "OPENID_DECODE_BASE_PATH")]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the JWK for a key id and print it as JSON
    Cert {
        /// Key id (`kid`) to look up
        kid: String,

        /// Realm to resolve the key in
        #[command(flatten)]
        realm: RealmArg,
    },

    /// Verify a token and print its header fields and claims
    Decode {
        /// Compact-serialized token, or `-` to read it from stdin
        token: String,

        /// Realm the token was issued by
        #[command(flatten)]
        realm: RealmArg,
    },
}

/// Realm (tenant) selection
#[derive(Args, Debug, Clone)]
pub struct RealmArg {
    /// Realm name appended to the issuer root URL
    #[arg(long, short = 'r')]
    pub realm: String,
}
