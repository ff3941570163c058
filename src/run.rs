//! Application execution logic.
//!
//! Builds a client from the validated configuration, sends the one
//! request and writes the response body to the given output.

use std::io::Write;

use thiserror::Error;

use api_client::api::{ApiClient, ApiError, log_exchange};
use api_client::config::ValidatedConfig;
use api_client::transport::{ReqwestTransport, Transport};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The request failed at some dispatch stage.
    #[error(transparent)]
    Request(#[from] ApiError),

    /// Writing the response body failed.
    #[error("Failed to write response body: {0}")]
    Output(#[source] std::io::Error),
}

/// Executes the configured request over the network.
///
/// # Errors
///
/// Returns an error if the request fails or the body cannot be written.
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    execute_with(config, ReqwestTransport::new(), &mut std::io::stdout()).await
}

/// Executes the configured request over `transport`, writing the body to `out`.
///
/// The body is written even for non-200 responses, since those usually
/// explain what went wrong; the error is still returned.
///
/// # Errors
///
/// Returns an error if the request fails or the body cannot be written.
pub async fn execute_with<T, W>(
    config: ValidatedConfig,
    transport: T,
    out: &mut W,
) -> Result<(), RunError>
where
    T: Transport,
    W: Write,
{
    let client = build_client(&config, transport);

    let (path, params) = (config.path.as_str(), &config.params);
    let result = match config.method.as_str() {
        "POST" => client.post(path, params).await,
        "PUT" => client.put(path, params).await,
        "DELETE" => client.delete(path, params).await,
        _ => client.get(path, params).await,
    };

    let (body, error) = match result {
        Ok(body) => (body, None),
        Err(e) => {
            let body = e.body().to_vec();
            (body, Some(e))
        }
    };

    if !body.is_empty() {
        out.write_all(&body).map_err(RunError::Output)?;
        out.flush().map_err(RunError::Output)?;
    }

    error.map_or(Ok(()), |e| Err(e.into()))
}

fn build_client<T>(config: &ValidatedConfig, transport: T) -> ApiClient<T> {
    let client = ApiClient::with_transport(config.base_url.as_str(), transport);

    config
        .headers
        .iter()
        .fold(client, |client, (name, value)| client.set_header(name, value.clone()))
        .trace(log_exchange)
}
