//! Configuration layer for the console.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values passed on the command line
//! 2. **Environment** - `ARCUBE_API_URL` for the base URL
//! 3. **TOML config file** - Values from the file given by `--config`
//! 4. **Built-in defaults** - Hardcoded default values
//!
//! # TOML-Only Options
//!
//! `orders.page_size` is only set in the config file; `--limit` overrides it
//! per command.
//!
//! # Paths
//!
//! A leading `~` in the session file path expands to the home directory.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, OrdersCommand, StatusArg, WebhookFields, WebhooksCommand};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, parse_headers, write_default_config};
