//! Process glue for the binary: exit codes, config hints and logging.

use std::process::ExitCode;

use api_client::config::ConfigError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Exit code for a configuration that could not be loaded or validated.
pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

/// Exit code for a request that failed at any dispatch stage.
pub fn request_error() -> ExitCode {
    ExitCode::from(2)
}

/// Suggests a fix for configuration errors that have an obvious one.
pub const fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::MissingBaseUrl => {
            Some("pass --base <URL> or a --config file with [client] base_url")
        }
        ConfigError::InvalidHeader { .. } => Some("headers look like -H 'Accept: text/plain'"),
        _ => None,
    }
}

/// Installs a stderr subscriber; `RUST_LOG` overrides the default level.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
