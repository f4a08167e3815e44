//! Tests for CLI argument parsing.

use clap::Parser;

use super::cli::{Cli, Command, OrdersCommand, StatusArg, WebhooksCommand};
use crate::orders::OrderStatus;

mod global_options {
    use super::*;

    #[test]
    fn parse_without_subcommand() {
        let cli = Cli::parse_from_iter(["arcube-console"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.is_init());
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::parse_from_iter([
            "arcube-console",
            "status",
            "--api-url",
            "https://api.example.com",
            "--session-file",
            "/tmp/session.json",
            "--timeout",
            "30",
            "-v",
        ]);

        assert!(matches!(cli.command, Some(Command::Status)));
        assert_eq!(cli.api_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(
            cli.session_file.as_deref(),
            Some(std::path::Path::new("/tmp/session.json"))
        );
        assert_eq!(cli.timeout, Some(30));
        assert!(cli.verbose);
    }

    #[test]
    fn init_has_default_output() {
        let cli = Cli::parse_from_iter(["arcube-console", "init"]);
        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, std::path::PathBuf::from("arcube-console.toml"));
            }
            other => panic!("Expected Init, got {other:?}"),
        }
    }
}

mod auth_commands {
    use super::*;

    #[test]
    fn login_takes_credentials() {
        let cli = Cli::parse_from_iter([
            "arcube-console",
            "login",
            "--email",
            "admin@arcube.com",
            "--password",
            "Admin@123456",
        ]);

        match cli.command {
            Some(Command::Login { email, password }) => {
                assert_eq!(email, "admin@arcube.com");
                assert_eq!(password, "Admin@123456");
            }
            other => panic!("Expected Login, got {other:?}"),
        }
    }

    #[test]
    fn logout_parses() {
        let cli = Cli::parse_from_iter(["arcube-console", "logout"]);
        assert!(matches!(cli.command, Some(Command::Logout)));
    }
}

mod order_commands {
    use super::*;

    #[test]
    fn list_with_filters() {
        let cli = Cli::parse_from_iter([
            "arcube-console",
            "orders",
            "list",
            "--status",
            "cancelled",
            "--page",
            "2",
            "--type",
            "lounge",
            "--with-products",
        ]);

        match cli.command {
            Some(Command::Orders(OrdersCommand::List {
                status,
                page,
                product_type,
                with_products,
                limit,
                ..
            })) => {
                assert_eq!(status, Some(StatusArg::Cancelled));
                assert_eq!(page, Some(2));
                assert_eq!(product_type.as_deref(), Some("lounge"));
                assert!(with_products);
                assert!(limit.is_none());
            }
            other => panic!("Expected orders list, got {other:?}"),
        }
    }

    #[test]
    fn status_arg_converts() {
        assert_eq!(OrderStatus::from(StatusArg::Refunded), OrderStatus::Refunded);
        assert_eq!(OrderStatus::from(StatusArg::Pending), OrderStatus::Pending);
    }

    #[test]
    fn cancel_collects_products() {
        let cli = Cli::parse_from_iter([
            "arcube-console",
            "orders",
            "cancel",
            "o-1",
            "--pnr",
            "ABC123",
            "--product",
            "p1",
            "--product",
            "p2",
        ]);

        match cli.command {
            Some(Command::Orders(OrdersCommand::Cancel {
                order_id,
                pnr,
                products,
                email,
            })) => {
                assert_eq!(order_id, "o-1");
                assert_eq!(pnr, "ABC123");
                assert_eq!(products, ["p1", "p2"]);
                assert!(email.is_none());
            }
            other => panic!("Expected orders cancel, got {other:?}"),
        }
    }

    #[test]
    fn cancel_requires_pnr() {
        let result = Cli::try_parse_from(["arcube-console", "orders", "cancel", "o-1"]);
        assert!(result.is_err());
    }
}

mod webhook_commands {
    use super::*;

    #[test]
    fn create_collects_events_and_retry() {
        let cli = Cli::parse_from_iter([
            "arcube-console",
            "webhooks",
            "create",
            "--name",
            "Prod",
            "--url",
            "https://hooks.example.com",
            "--event",
            "cancellation.started",
            "--event",
            "refund.processed",
            "--header",
            "X-Env=prod",
            "--max-retries",
            "5",
        ]);

        match cli.command {
            Some(Command::Webhooks(WebhooksCommand::Create {
                name,
                events,
                extra,
                ..
            })) => {
                assert_eq!(name, "Prod");
                assert_eq!(events, ["cancellation.started", "refund.processed"]);
                assert_eq!(extra.headers, ["X-Env=prod"]);
                assert_eq!(extra.max_retries, Some(5));
                assert!(extra.has_retry());
            }
            other => panic!("Expected webhooks create, got {other:?}"),
        }
    }

    #[test]
    fn create_requires_an_event() {
        let result = Cli::try_parse_from([
            "arcube-console",
            "webhooks",
            "create",
            "--name",
            "Prod",
            "--url",
            "https://hooks.example.com",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn update_takes_active_flag() {
        let cli = Cli::parse_from_iter([
            "arcube-console",
            "webhooks",
            "update",
            "w-1",
            "--active",
            "false",
        ]);

        match cli.command {
            Some(Command::Webhooks(WebhooksCommand::Update {
                id, active, extra, ..
            })) => {
                assert_eq!(id, "w-1");
                assert_eq!(active, Some(false));
                assert!(!extra.has_retry());
            }
            other => panic!("Expected webhooks update, got {other:?}"),
        }
    }
}
