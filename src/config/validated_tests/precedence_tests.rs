//! Tests for CLI vs TOML precedence rules.

use std::path::PathBuf;
use std::time::Duration;

use super::*;

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_api_url_overrides_toml() {
        let cli = cli(&["--api-url", "https://cli.example.com", "--session-file", "s.json"]);
        let toml = toml(
            r#"
            [api]
            base_url = "https://toml.example.com"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.api_url.as_str(), "https://cli.example.com/");
    }

    #[test]
    fn cli_timeout_overrides_toml() {
        let cli = cli(&["--timeout", "3", "--session-file", "s.json"]);
        let toml = toml("[api]\ntimeout = 30");

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn cli_session_file_overrides_toml() {
        let cli = cli(&["--session-file", "/tmp/cli.json"]);
        let toml = toml("[session]\nfile = \"/tmp/toml.json\"");

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.session_file, PathBuf::from("/tmp/cli.json"));
    }
}

mod toml_fallback {
    use super::*;

    #[test]
    fn toml_values_used_when_cli_absent() {
        let cli = cli(&[]);
        let toml = toml(
            r#"
            [api]
            base_url = "https://toml.example.com/v1/"
            timeout = 20

            [session]
            file = "/tmp/toml.json"

            [orders]
            page_size = 50
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        // Only meaningful when ARCUBE_API_URL is not set in the environment
        if std::env::var_os("ARCUBE_API_URL").is_none() {
            assert_eq!(config.api_url.as_str(), "https://toml.example.com/v1/");
        }
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.session_file, PathBuf::from("/tmp/toml.json"));
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let cli = cli(&[]);
        let toml = toml("[session]\nfile = \"~/.arcube-console/work.json\"");

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(
            config.session_file,
            home.join(".arcube-console").join("work.json")
        );
    }

    #[test]
    fn paths_without_tilde_are_kept() {
        let cli = cli(&["--session-file", "relative/session.json"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.session_file, PathBuf::from("relative/session.json"));
    }
}
