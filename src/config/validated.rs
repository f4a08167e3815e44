//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use url::Url;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    /// Backend base URL
    pub api_url: Url,

    /// Ceiling for each request
    pub timeout: Duration,

    /// Where the session is persisted
    pub session_file: PathBuf,

    /// Orders per page when the command does not say
    pub page_size: u32,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ api_url: {}, timeout: {}s, session_file: {}, page_size: {} }}",
            self.api_url,
            self.timeout.as_secs(),
            self.session_file.display(),
            self.page_size,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (including their environment variables) take precedence
    /// over TOML config values, which take precedence over defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API URL is invalid or not http(s)
    /// - The timeout is zero or too large
    /// - The page size is out of range
    /// - No session file is given and the home directory is unknown
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let api_url = Self::resolve_api_url(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let session_file = Self::resolve_session_file(cli, toml)?;
        let page_size = Self::resolve_page_size(toml)?;

        Ok(Self {
            api_url,
            timeout,
            session_file,
            page_size,
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

    fn resolve_api_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // Priority: CLI / env > TOML > default
        let url_str = cli
            .api_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.api.base_url.as_deref()))
            .unwrap_or(defaults::API_URL);

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(url)
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.api.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        if seconds > defaults::MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: format!("must be at most {}s", defaults::MAX_TIMEOUT_SECS),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_session_file(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<PathBuf, ConfigError> {
        // CLI takes precedence
        if let Some(ref path) = cli.session_file {
            return Ok(expand_home(path));
        }

        if let Some(path) = toml.and_then(|t| t.session.file.as_deref()) {
            return Ok(expand_home(Path::new(path)));
        }

        defaults::session_file().ok_or_else(|| {
            ConfigError::missing(
                field::SESSION_FILE,
                "Home directory not found; use --session-file or set session.file in config file",
            )
        })
    }

    fn resolve_page_size(toml: Option<&TomlConfig>) -> Result<u32, ConfigError> {
        let size = toml
            .and_then(|t| t.orders.page_size)
            .unwrap_or(defaults::PAGE_SIZE);

        if size == 0 || size > defaults::MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(size));
        }

        Ok(size)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parses `--header` values into a header map.
///
/// Later values replace earlier ones with the same name.
///
/// # Errors
///
/// Returns an error for a malformed pair or an invalid header name or value.
pub fn parse_headers(values: &[String]) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut headers = BTreeMap::new();
    for value in values {
        let (name, value) = parse_header_string(value)?;
        parse_header_name(&name)?;
        parse_header_value(&name, &value)?;
        headers.insert(name, value);
    }
    Ok(headers)
}

// Helper functions

/// Replaces a leading `~` with the home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
