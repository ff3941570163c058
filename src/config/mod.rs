//! Configuration layer for the `api-client` command.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`MethodArg`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - `--base`, `--header`
//! 2. **TOML config file** - `client.base_url`, `[headers]`
//!
//! Headers are merged by canonical name, so `-H 'accept: text/plain'`
//! replaces an `Accept` entry from the file. Params are additive: the
//! file's `[params]` come first, then `--params`.
//!
//! # Example file
//!
//! ```toml
//! [client]
//! base_url = "https://api.example.com/v1"
//!
//! [headers]
//! Authorization = "Bearer secret"
//!
//! [params]
//! lang = "en"
//! ```

mod cli;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, MethodArg};
pub use error::ConfigError;
pub use toml::{ClientSection, TomlConfig};
pub use validated::ValidatedConfig;
