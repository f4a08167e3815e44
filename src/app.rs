//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use arcube_console::config::{ConfigError, field};
use arcube_console::route::Route;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, unreadable config file, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - network failure, server rejection, etc.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }

    /// Not signed in, or not allowed (exit code 3).
    pub fn auth_error() -> ExitCode {
        ExitCode::from(3)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::FileRead { .. } | ConfigError::TomlParse(_) => {
            eprintln!("\nRun 'arcube-console init' to generate a configuration template.");
        }
        ConfigError::MissingRequired { field: f, .. } if *f == field::SESSION_FILE => {
            eprintln!("\nPass --session-file to choose where the session is stored.");
        }
        _ => {}
    }
}

/// Prints what the user should do after the client was sent to `route`.
pub fn print_redirect_hint(route: Route) {
    match route {
        Route::Login => {
            eprintln!("\nYou are not signed in. Run 'arcube-console login --email <EMAIL>'.");
        }
        Route::Unauthorized => {
            eprintln!("\nYour account is not allowed to do this.");
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
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
