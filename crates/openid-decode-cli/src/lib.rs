//! # openid-decode CLI
//!
//! Operator tooling over the `openid-decode` library: inspect a realm's
//! signing keys and verify access tokens from the shell.
//!
//! ## Usage
//!
//! ```bash
//! # Print the JWK behind a key id
//! openid-decode --base-url https://sso.example.com/realms \
//!   cert 1h_MHweQR-g8osNYJvhd-FZ4s2lJ52PRm0G68jsuLPc --realm master
//!
//! # Verify a token and print alg, kid and claims
//! echo "$TOKEN" | openid-decode decode - --realm master
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod settings;

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use openid_decode::{CertManager, JwtDecoder};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use cli::{Cli, Commands, GlobalArgs};
pub use error::{CliError, CliResult};

/// Parse arguments, run the selected command and print its output
///
/// # Errors
///
/// Any [`CliError`] raised while loading configuration or running the command
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose) {
        eprintln!("warning: {e:#}");
    }

    let config = settings::load(&cli.global)?;
    let resolver = Arc::new(CertManager::from_config(&config)?);

    let output = match cli.command {
        Commands::Cert { kid, realm } => {
            commands::cert(resolver.as_ref(), &kid, &realm.realm).await?
        }
        Commands::Decode { token, realm } => {
            let token = commands::read_token(&token, &mut tokio::io::stdin()).await?;
            let decoder = JwtDecoder::new(resolver);
            commands::decode(&decoder, &token, &realm.realm).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Install a stderr `fmt` subscriber
///
/// `RUST_LOG` wins; otherwise `debug` with `-v` and `warn` without.
///
/// # Errors
///
/// Fails if a global subscriber is already installed
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .try_init()
        .context("failed to install log subscriber")
}
