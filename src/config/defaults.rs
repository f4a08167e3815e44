//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Default backend base URL.
pub const API_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 10;

/// Largest accepted request timeout in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Directory under the home directory holding client state.
pub const STATE_DIR: &str = ".arcube-console";

/// File name of the persisted session inside [`STATE_DIR`].
pub const SESSION_FILE: &str = "session.json";

/// Default output path of `init`.
pub const CONFIG_FILE: &str = "arcube-console.toml";

/// Default number of orders per page.
pub const PAGE_SIZE: u32 = 10;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}

/// Default session file, `~/.arcube-console/session.json`.
///
/// None if the home directory cannot be determined.
#[must_use]
pub fn session_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(STATE_DIR).join(SESSION_FILE))
}
