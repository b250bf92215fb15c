//! Layered resolver configuration
//!
//! Precedence, lowest first: built-in defaults, `--config` file,
//! `OPENID_DECODE_*` environment variables, command-line flags.

use config::{Config, Environment, File};
use openid_decode::ResolverConfig;
use tracing::debug;

use crate::cli::GlobalArgs;
use crate::error::CliResult;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "OPENID_DECODE";

/// Load the resolver configuration from the process environment
///
/// # Errors
///
/// Returns [`CliError::Config`](crate::error::CliError::Config) if the file
/// cannot be read or a value has the wrong type
pub fn load(args: &GlobalArgs) -> CliResult<ResolverConfig> {
    load_with_env(args, environment())
}

/// `OPENID_DECODE_BASE_PATH`, `OPENID_DECODE_HTTP__TIMEOUT_SECS`, ...
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load the resolver configuration with an explicit environment source
///
/// # Errors
///
/// Returns [`CliError::Config`](crate::error::CliError::Config) if the file
/// cannot be read or a value has the wrong type
pub fn load_with_env(args: &GlobalArgs, env: Environment) -> CliResult<ResolverConfig> {
    let defaults = ResolverConfig::default();

    let mut builder = Config::builder().set_default("base_path", defaults.base_path)?;

    if let Some(path) = &args.config {
        debug!(path = %path.display(), "Loading configuration file");
        builder = builder.add_source(File::from(path.as_path()));
    }

    let config: ResolverConfig = builder
        .add_source(env)
        .set_override_option("base_path", args.base_url.clone())?
        .set_override_option("http.timeout_secs", args.timeout)?
        .build()?
        .try_deserialize()?;

    debug!(
        base_path = %config.base_path,
        timeout_secs = ?config.http.timeout_secs,
        "Resolved configuration"
    );
    Ok(config)
}
