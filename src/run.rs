//! Application execution logic.
//!
//! Wires the transport, session store and gateways together and runs one
//! command against the backend.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;

use arcube_console::api::{ApiClient, ApiError};
use arcube_console::auth::{AuthManager, LoginOutcome};
use arcube_console::config::{
    Command, ConfigError, OrdersCommand, StatusArg, ValidatedConfig, WebhookFields,
    WebhooksCommand, parse_headers,
};
use arcube_console::orders::{OrderFilter, OrdersGateway};
use arcube_console::route::{RecordingNavigator, Route};
use arcube_console::session::{FileSessionStore, SessionContext, SessionStore, User};
use arcube_console::time::{Clock, SystemClock};
use arcube_console::transport::{HttpClient, HttpError, ReqwestClient};
use arcube_console::view::{Invalidation, OrderListView};
use arcube_console::webhooks::{CreateWebhook, RetryConfig, UpdateWebhook, WebhooksGateway};

use crate::{app, render};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to create the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Transport(#[source] HttpError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// No valid session is stored.
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Only administrators can manage webhooks")]
    AdminOnly,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// The product is unknown or can no longer be cancelled.
    #[error("Product {0} cannot be cancelled")]
    NotCancellable(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Nothing to update")]
    EmptyUpdate,

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl RunError {
    /// True if the command failed for lack of a session or permission.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        match self {
            Self::NotSignedIn | Self::AdminOnly => true,
            Self::Api(e) => e.is_auth(),
            _ => false,
        }
    }
}

/// Runs `command` against the configured backend, writing results to stdout.
///
/// Excluded from coverage - requires a live backend.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, command: Command) -> Result<(), RunError> {
    let http = ReqwestClient::with_timeout(config.timeout).map_err(RunError::Transport)?;
    let session = Arc::new(SessionContext::new(FileSessionStore::new(
        config.session_file,
    )));
    let navigator = Arc::new(RecordingNavigator::new());
    let api = ApiClient::new(http, config.api_url, session, navigator.clone());
    let console = Console::new(api, config.page_size, Box::new(SystemClock));

    let result = console.run(command, &mut io::stdout().lock()).await;

    if let Some(route) = navigator.last() {
        app::print_redirect_hint(route);
    }
    result
}

/// One client instance: the auth manager and gateways over a shared API client.
pub struct Console<H, S> {
    auth: AuthManager<H, S>,
    orders: OrdersGateway<H, S>,
    webhooks: WebhooksGateway<H, S>,
    clock: Box<dyn Clock>,
    page_size: u32,
}

impl<H: HttpClient + Clone, S: SessionStore> Console<H, S> {
    pub fn new(api: ApiClient<H, S>, page_size: u32, clock: Box<dyn Clock>) -> Self {
        Self {
            auth: AuthManager::new(api.clone()),
            orders: OrdersGateway::new(api.clone()),
            webhooks: WebhooksGateway::new(api),
            clock,
            page_size,
        }
    }

    /// Executes one command.
    ///
    /// # Errors
    ///
    /// See [`RunError`].
    pub async fn run<W: Write>(&self, command: Command, out: &mut W) -> Result<(), RunError> {
        match command {
            Command::Init { .. } => Ok(()),
            Command::Login { email, password } => self.login(&email, &password, out).await,
            Command::Logout => {
                self.auth.logout();
                writeln!(out, "Signed out")?;
                Ok(())
            }
            Command::Status => self.status(out).await,
            Command::Orders(cmd) => {
                self.require_session(Route::Orders).await?;
                self.orders_command(cmd, out).await
            }
            Command::Webhooks(cmd) => {
                let user = self.require_session(Route::Webhooks).await?;
                if !user.role.can_manage_webhooks() {
                    tracing::info!(role = %user.role, "Webhook command refused");
                    return Err(RunError::AdminOnly);
                }
                self.webhooks_command(cmd, out).await
            }
        }
    }

    async fn login<W: Write>(&self, email: &str, password: &str, out: &mut W) -> Result<(), RunError> {
        match self.auth.login(email, password).await {
            LoginOutcome::Success(user) => {
                writeln!(out, "Signed in as {} ({})", user.email, user.role)?;
                Ok(())
            }
            LoginOutcome::Failure { message } => Err(RunError::LoginFailed(message)),
        }
    }

    async fn status<W: Write>(&self, out: &mut W) -> Result<(), RunError> {
        self.auth.check_auth().await;
        match self.auth.current_user() {
            Some(user) => render::user(out, &user)?,
            None => writeln!(out, "Not signed in")?,
        }
        Ok(())
    }

    /// Resolves the stored session; without one the client is sent to login.
    async fn require_session(&self, current: Route) -> Result<User, RunError> {
        self.auth.check_auth().await;
        if let Some(user) = self.auth.current_user() {
            return Ok(user);
        }
        if let Some(route) = self.auth.redirect_for(current) {
            self.auth.api().navigator().navigate(route);
        }
        Err(RunError::NotSignedIn)
    }

    async fn orders_command<W: Write>(
        &self,
        command: OrdersCommand,
        out: &mut W,
    ) -> Result<(), RunError> {
        match command {
            OrdersCommand::List {
                page,
                limit,
                status,
                provider,
                product_type,
                search,
                with_products,
            } => {
                let filter = self.order_filter(page, limit, status, provider, product_type);
                if with_products {
                    let page = self.orders.list_orders_with_products(&filter).await?;
                    render::orders_with_products(out, &page, search.as_deref(), self.clock.now())?;
                } else {
                    self.list_orders(filter, search, out).await?;
                }
                Ok(())
            }
            OrdersCommand::Show { order_id } => {
                let joined = self.orders.get_order_with_products(&order_id).await?;
                render::order_detail(out, &joined, self.clock.now())?;
                Ok(())
            }
            OrdersCommand::Cancel {
                order_id,
                pnr,
                products,
                email,
            } => {
                self.cancel_order(&order_id, &pnr, &products, email.as_deref(), out)
                    .await
            }
        }
    }

    fn order_filter(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        status: Option<StatusArg>,
        provider: Option<String>,
        product_type: Option<String>,
    ) -> OrderFilter {
        let mut filter = OrderFilter::new()
            .page(page.unwrap_or(1))
            .limit(limit.unwrap_or(self.page_size));
        filter.status = status.map(Into::into);
        filter.provider = provider;
        filter.product_type = product_type;
        filter
    }

    async fn list_orders<W: Write>(
        &self,
        filter: OrderFilter,
        search: Option<String>,
        out: &mut W,
    ) -> Result<(), RunError> {
        let mut view = OrderListView::new(filter);
        view.set_search(search.unwrap_or_default());

        let ticket = view.begin_fetch();
        let page = self.orders.list_orders(view.filter()).await?;
        view.apply(ticket, Ok(page));

        render::orders(out, view.pagination(), view.visible(), &view.status_counts())?;
        Ok(())
    }

    async fn cancel_order<W: Write>(
        &self,
        order_id: &str,
        pnr: &str,
        products: &[String],
        customer_email: Option<&str>,
        out: &mut W,
    ) -> Result<(), RunError> {
        if let [product_id] = products {
            let joined = self.orders.get_order_with_products(order_id).await?;
            if !joined.product(product_id).is_some_and(|p| p.is_cancellable()) {
                return Err(RunError::NotCancellable(product_id.clone()));
            }
        }

        let mutation = self
            .orders
            .cancel_order(order_id, pnr, products, customer_email)
            .await?;
        match products {
            [product_id] => writeln!(out, "Cancellation submitted for product {product_id}")?,
            _ => writeln!(out, "Cancellation submitted for order {order_id}")?,
        }

        for invalidation in &mutation.invalidates {
            if let Invalidation::Order(id) = invalidation {
                let refreshed = self.orders.get_order_with_products(id).await?;
                writeln!(out, "Order {id} is now {}", refreshed.order.status)?;
            }
        }
        Ok(())
    }

    async fn webhooks_command<W: Write>(
        &self,
        command: WebhooksCommand,
        out: &mut W,
    ) -> Result<(), RunError> {
        match command {
            WebhooksCommand::List => render::webhooks(out, &self.webhooks.list_webhooks().await?)?,
            WebhooksCommand::Show { id } => {
                render::webhook_detail(out, &self.webhooks.get_webhook(&id).await?)?;
            }
            WebhooksCommand::Create {
                name,
                url,
                events,
                extra,
            } => self.create_webhook(name, url, events, &extra, out).await?,
            WebhooksCommand::Update {
                id,
                name,
                url,
                events,
                active,
                extra,
            } => {
                let mut payload = UpdateWebhook {
                    name,
                    url,
                    events: (!events.is_empty()).then_some(events),
                    is_active: active,
                    ..UpdateWebhook::default()
                };
                self.update_webhook(&id, &mut payload, &extra, out).await?;
            }
            WebhooksCommand::Delete { id } => {
                self.webhooks.delete_webhook(&id).await?.into_result();
                writeln!(out, "Deleted webhook {id}")?;
            }
            WebhooksCommand::Test { id } => {
                render::test_result(out, &self.webhooks.test_webhook(&id).await?)?;
            }
            WebhooksCommand::Deliveries { id } => {
                render::deliveries(out, &self.webhooks.list_deliveries(&id).await?)?;
            }
            WebhooksCommand::Stats => render::stats(out, &self.webhooks.stats().await?)?,
        }
        Ok(())
    }

    async fn create_webhook<W: Write>(
        &self,
        name: String,
        url: String,
        events: Vec<String>,
        extra: &WebhookFields,
        out: &mut W,
    ) -> Result<(), RunError> {
        let mut payload = CreateWebhook::new(name, url, events);
        payload.headers = headers(extra)?;
        payload.secret.clone_from(&extra.secret);
        payload.retry_config = Some(merge_retry(RetryConfig::default(), extra));

        let created = self.webhooks.create_webhook(&payload).await?.into_result();
        writeln!(out, "Created webhook {} ({})", created.id, created.name)?;
        Ok(())
    }

    async fn update_webhook<W: Write>(
        &self,
        id: &str,
        payload: &mut UpdateWebhook,
        extra: &WebhookFields,
        out: &mut W,
    ) -> Result<(), RunError> {
        payload.headers = headers(extra)?;
        payload.secret.clone_from(&extra.secret);
        if extra.has_retry() {
            let current = self.webhooks.get_webhook(id).await?;
            payload.retry_config = Some(merge_retry(current.retry_config, extra));
        }
        if payload.is_empty() {
            return Err(RunError::EmptyUpdate);
        }

        let updated = self.webhooks.update_webhook(id, payload).await?.into_result();
        writeln!(out, "Updated webhook {} ({})", updated.id, updated.name)?;
        Ok(())
    }
}

fn headers(extra: &WebhookFields) -> Result<Option<BTreeMap<String, String>>, ConfigError> {
    if extra.headers.is_empty() {
        return Ok(None);
    }
    parse_headers(&extra.headers).map(Some)
}

/// Applies the retry flags that were given on top of `base`.
fn merge_retry(base: RetryConfig, extra: &WebhookFields) -> RetryConfig {
    RetryConfig {
        max_retries: extra.max_retries.unwrap_or(base.max_retries),
        retry_delay: extra.retry_delay.unwrap_or(base.retry_delay),
        backoff_multiplier: extra.backoff.unwrap_or(base.backoff_multiplier),
    }
}
