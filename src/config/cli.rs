//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::orders::OrderStatus;

/// Arcube Console: order and cancellation administration
///
/// Signs in to the Arcube backend, browses and cancels orders, and
/// manages webhook notifications.
#[derive(Debug, Parser)]
#[command(name = "arcube-console")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: status)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Backend base URL
    #[arg(long = "api-url", env = "ARCUBE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to configuration file
    #[arg(long, short, env = "ARCUBE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Path to the session file
    #[arg(long = "session-file", global = true)]
    pub session_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for arcube-console
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "arcube-console.toml")]
        output: PathBuf,
    },

    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "ARCUBE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and remove the stored session
    Logout,

    /// Validate the stored session and show the signed-in user
    Status,

    /// Browse and cancel orders
    #[command(subcommand)]
    Orders(OrdersCommand),

    /// Manage webhook notifications (admin only)
    #[command(subcommand)]
    Webhooks(WebhooksCommand),
}

/// Order subcommands.
#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List orders
    List {
        /// Page number (1-based)
        #[arg(long)]
        page: Option<u32>,

        /// Orders per page
        #[arg(long)]
        limit: Option<u32>,

        /// Only orders with this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Only orders with products from this provider
        #[arg(long)]
        provider: Option<String>,

        /// Only orders with products of this type
        #[arg(long = "type")]
        product_type: Option<String>,

        /// Case-insensitive search over PNR, customer name and email
        #[arg(long)]
        search: Option<String>,

        /// Include each order's products
        #[arg(long = "with-products")]
        with_products: bool,
    },

    /// Show one order with its products
    Show {
        /// Order id
        order_id: String,
    },

    /// Cancel an order or one of its products
    Cancel {
        /// Order id
        order_id: String,

        /// Booking reference of the order
        #[arg(long)]
        pnr: String,

        /// Product to cancel; several (or none) cancel the whole order
        #[arg(long = "product", value_name = "PRODUCT_ID")]
        products: Vec<String>,

        /// Customer email identifying the order (default: your email)
        #[arg(long)]
        email: Option<String>,
    },
}

/// Webhook subcommands.
#[derive(Debug, Subcommand)]
pub enum WebhooksCommand {
    /// List webhooks
    List,

    /// Show one webhook
    Show {
        /// Webhook id
        id: String,
    },

    /// Create a webhook
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Target URL
        #[arg(long)]
        url: String,

        /// Subscribed event type (can be specified multiple times)
        #[arg(long = "event", value_name = "EVENT", required = true)]
        events: Vec<String>,

        #[command(flatten)]
        extra: WebhookFields,
    },

    /// Update a webhook; only given fields change
    Update {
        /// Webhook id
        id: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Target URL
        #[arg(long)]
        url: Option<String>,

        /// Subscribed event type; replaces the current set
        #[arg(long = "event", value_name = "EVENT")]
        events: Vec<String>,

        /// Enable or disable deliveries
        #[arg(long)]
        active: Option<bool>,

        #[command(flatten)]
        extra: WebhookFields,
    },

    /// Delete a webhook
    Delete {
        /// Webhook id
        id: String,
    },

    /// Send a test event
    Test {
        /// Webhook id
        id: String,
    },

    /// Show delivery history
    Deliveries {
        /// Webhook id
        id: String,
    },

    /// Show delivery statistics
    Stats,
}

/// Options shared by webhook create and update.
#[derive(Debug, Default, Args)]
pub struct WebhookFields {
    /// Custom request header in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V")]
    pub headers: Vec<String>,

    /// HMAC signing secret
    #[arg(long)]
    pub secret: Option<String>,

    /// Maximum redelivery attempts
    #[arg(long = "max-retries")]
    pub max_retries: Option<u32>,

    /// Delay before the first redelivery, in milliseconds
    #[arg(long = "retry-delay")]
    pub retry_delay: Option<u64>,

    /// Multiplier applied to the delay after each redelivery
    #[arg(long)]
    pub backoff: Option<f64>,
}

impl WebhookFields {
    /// True if any retry option was given.
    #[must_use]
    pub const fn has_retry(&self) -> bool {
        self.max_retries.is_some() || self.retry_delay.is_some() || self.backoff.is_some()
    }
}

/// Order status argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Pending,
    Confirmed,
    Cancelled,
    Refunded,
    Expired,
}

impl From<StatusArg> for OrderStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Confirmed => Self::Confirmed,
            StatusArg::Cancelled => Self::Cancelled,
            StatusArg::Refunded => Self::Refunded,
            StatusArg::Expired => Self::Expired,
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

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
