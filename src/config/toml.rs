//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Backend connection section
    #[serde(default)]
    pub api: ApiSection,

    /// Session persistence section
    #[serde(default)]
    pub session: SessionSection,

    /// Order listing section
    #[serde(default)]
    pub orders: OrdersSection,
}

/// Backend connection section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    /// Backend base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// Session persistence section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    /// Path of the session file; `~` expands to the home directory
    pub file: Option<String>,
}

/// Order listing section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrdersSection {
    /// Orders per page when `--limit` is not given
    pub page_size: Option<u32>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Arcube Console Configuration File

[api]
# Backend base URL (default: http://localhost:8080)
# Overridden by --api-url or the ARCUBE_API_URL environment variable
# base_url = "https://api.arcube.example.com"

# Request timeout in seconds (default: 10, max: 300)
# timeout = 10

[session]
# Where the signed-in session (token and user) is stored
# (default: ~/.arcube-console/session.json)
# file = "~/.arcube-console/session.json"

[orders]
# Orders per page when --limit is not given (default: 10, max: 100)
# page_size = 10
"#
    .to_string()
}
