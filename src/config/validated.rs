//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::collections::BTreeMap;
use std::fmt;

use http::Method;
use http::header::{HeaderName, HeaderValue};
use url::Url;

use crate::api::Params;
use crate::transport::canonical_header_name;

use super::cli::Cli;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Base URL requests are resolved against
    pub base_url: Url,

    /// HTTP method
    pub method: Method,

    /// Request path
    pub path: String,

    /// Default headers keyed by canonical name
    pub headers: BTreeMap<String, String>,

    /// Request params
    pub params: Params,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ base_url: {}, method: {}, path: {}, headers: {}, params: {} }}",
            self.base_url,
            self.method,
            self.path,
            self.headers.len(),
            self.params.len(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values. Params from
    /// both sources are kept, TOML first.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No base URL is given
    /// - The base URL is not an absolute URL
    /// - A header is malformed or has an invalid name or value
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let base_url = Self::resolve_base_url(cli, toml)?;
        let headers = Self::resolve_headers(cli, toml)?;
        let params = Self::resolve_params(cli, toml);

        Ok(Self {
            base_url,
            method: cli.method.into(),
            path: cli.path.clone(),
            headers,
            params,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_base_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // CLI takes precedence
        let url_str = cli
            .base
            .as_deref()
            .or_else(|| toml.and_then(|t| t.client.base_url.as_deref()))
            .ok_or(ConfigError::MissingBaseUrl)?;

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: "cannot be used as a base URL".to_string(),
            });
        }

        Ok(url)
    }

    fn resolve_headers(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut headers = BTreeMap::new();

        // Add TOML headers first (CLI can override)
        if let Some(toml) = toml {
            for (name, value) in &toml.headers {
                validate_header(name, value)?;
                headers.insert(canonical_header_name(name), value.clone());
            }
        }

        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            validate_header(&name, &value)?;
            headers.insert(canonical_header_name(&name), value);
        }

        Ok(headers)
    }

    fn resolve_params(cli: &Cli, toml: Option<&TomlConfig>) -> Params {
        let mut params: Params = toml
            .map(|t| t.params.iter().collect())
            .unwrap_or_default();

        if let Some(ref query) = cli.params {
            params.extend_from(&Params::parse(query));
        }

        params
    }
}

// Helper functions

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // "Key: Value" first: values such as base64 tokens may contain '='
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    Ok(())
}
