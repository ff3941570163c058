//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// api-client: send one form-encoded request and print the response body
///
/// The base URL comes from --base or the config file; default headers
/// and params from the config file are merged with the ones given here.
#[derive(Debug, Parser)]
#[command(name = "api-client")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// HTTP method
    #[arg(value_enum, ignore_case = true)]
    pub method: MethodArg,

    /// Path resolved against the base URL
    pub path: String,

    /// Base URL (overrides `client.base_url` from the config file)
    #[arg(long)]
    pub base: Option<String>,

    /// HTTP headers in 'Key: Value' or 'Key=Value' format (can be specified multiple times)
    #[arg(long = "header", short = 'H', value_name = "K:V")]
    pub headers: Vec<String>,

    /// Request params as a urlencoded string, e.g. 'a=1&b=2'
    #[arg(long)]
    pub params: Option<String>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// HTTP method argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Query-string request
    Get,
    /// Form body, create
    Post,
    /// Form body, replace
    Put,
    /// Form body, remove
    Delete,
}

impl From<MethodArg> for http::Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Get => Self::GET,
            MethodArg::Post => Self::POST,
            MethodArg::Put => Self::PUT,
            MethodArg::Delete => Self::DELETE,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Parses CLI arguments from an iterator, returning clap's error on failure.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown flags, bad methods or missing arguments.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }
}
