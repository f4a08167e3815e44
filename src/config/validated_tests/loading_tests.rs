//! Tests for configuration loading, defaults and validation.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::{NamedTempFile, tempdir};

use super::*;

mod defaults {
    use super::*;

    #[test]
    fn defaults_apply_without_sources() {
        let cli = cli(&["--api-url", "http://localhost:8080", "--session-file", "s.json"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.page_size, 10);
        assert!(!config.verbose);
    }

    #[test]
    fn default_session_file_lives_under_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let cli = cli(&["--api-url", "http://localhost:8080"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(
            config.session_file,
            home.join(".arcube-console").join("session.json")
        );
    }

    #[test]
    fn display_summarizes_config() {
        let cli = cli(&["--api-url", "https://api.example.com", "--session-file", "s.json"]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        let text = config.to_string();
        assert!(text.contains("https://api.example.com/"));
        assert!(text.contains("timeout: 10s"));
    }
}

mod validation {
    use super::*;

    #[test]
    fn invalid_url_rejected() {
        let cli = cli(&["--api-url", "not a url", "--session-file", "s.json"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn non_http_scheme_rejected() {
        let cli = cli(&["--api-url", "ftp://files.example.com", "--session-file", "s.json"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { reason, .. }) if reason.contains("http")));
    }

    #[test]
    fn zero_timeout_rejected() {
        let cli = cli(&["--timeout", "0", "--session-file", "s.json"]);
        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration { field: "timeout", .. })
        ));
    }

    #[test]
    fn excessive_timeout_rejected() {
        let cli = cli(&["--timeout", "301", "--session-file", "s.json"]);
        assert!(ValidatedConfig::from_raw(&cli, None).is_err());
    }

    #[test]
    fn page_size_out_of_range_rejected() {
        let cli = cli(&["--session-file", "s.json"]);

        for size in [0, 101] {
            let toml = toml(&format!("[orders]\npage_size = {size}"));
            let result = ValidatedConfig::from_raw(&cli, Some(&toml));
            assert!(matches!(result, Err(ConfigError::InvalidPageSize(s)) if s == size));
        }
    }
}

mod config_load {
    use super::*;

    #[test]
    fn load_from_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [api]
            base_url = "https://api.arcube.example.com"
            timeout = 5

            [session]
            file = "/var/lib/arcube/session.json"
        "#
        )
        .unwrap();

        let cli = cli(&["--config", file.path().to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.session_file,
            Path::new("/var/lib/arcube/session.json")
        );
    }

    #[test]
    fn load_nonexistent_config_file_returns_error() {
        let cli = cli(&["--config", "nonexistent_file_12345.toml"]);
        let result = ValidatedConfig::load(&cli);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn load_invalid_config_file_returns_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        let cli = cli(&["--config", file.path().to_str().unwrap()]);

        assert!(matches!(
            ValidatedConfig::load(&cli),
            Err(ConfigError::TomlParse(_))
        ));
    }
}

mod write_config {
    use super::super::super::validated::write_default_config;
    use super::*;

    #[test]
    fn write_default_config_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test-config.toml");

        write_default_config(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[api]"));
        assert!(content.contains("[session]"));
        assert!(content.contains("[orders]"));
    }

    #[test]
    fn write_default_config_to_invalid_path_returns_error() {
        let path = Path::new("/nonexistent_dir_12345/config.toml");
        let result = write_default_config(path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}

mod headers {
    use super::super::super::validated::parse_headers;
    use super::*;

    #[test]
    fn accepts_both_formats() {
        let headers = parse_headers(&[
            "X-Env=prod".to_string(),
            "X-Team: payments".to_string(),
        ])
        .unwrap();

        assert_eq!(headers.get("X-Env").map(String::as_str), Some("prod"));
        assert_eq!(headers.get("X-Team").map(String::as_str), Some("payments"));
    }

    #[test]
    fn later_value_wins() {
        let headers =
            parse_headers(&["X-Env=staging".to_string(), "X-Env=prod".to_string()]).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["X-Env"], "prod");
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(matches!(
            parse_headers(&["no-separator".to_string()]),
            Err(ConfigError::InvalidHeader { .. })
        ));
        assert!(matches!(
            parse_headers(&["Bad Name=x".to_string()]),
            Err(ConfigError::InvalidHeaderName { .. })
        ));
        assert!(matches!(
            parse_headers(&["X-Env=line\nbreak".to_string()]),
            Err(ConfigError::InvalidHeaderValue { .. })
        ));
    }
}
