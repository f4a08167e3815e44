use crate::api::ApiError;
use crate::orders::{Order, OrderFilter, OrderPage, OrdersGateway, Pagination, StatusCounts};
use crate::session::SessionStore;
use crate::transport::HttpClient;

use super::{Generation, Invalidation, Ticket};

/// Load state of a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    /// Nothing fetched yet, or the last result was invalidated.
    Stale,
    Loading,
    Ready,
    /// The last fetch failed with this displayable message.
    Failed(String),
}

/// State behind the order list view.
///
/// Each fetch runs under a fresh [`Ticket`]; a result is applied only if
/// its ticket is still current, so a slow response never overwrites the
/// result of a newer fetch or touches a dismissed view.
#[derive(Debug)]
pub struct OrderListView {
    filter: OrderFilter,
    search: String,
    generation: Generation,
    state: ListState,
    orders: Vec<Order>,
    pagination: Pagination,
}

impl Default for OrderListView {
    fn default() -> Self {
        Self::new(OrderFilter::default())
    }
}

impl OrderListView {
    #[must_use]
    pub fn new(filter: OrderFilter) -> Self {
        Self {
            filter,
            search: String::new(),
            generation: Generation::new(),
            state: ListState::Stale,
            orders: Vec::new(),
            pagination: Pagination::default(),
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &OrderFilter {
        &self.filter
    }

    /// Replaces the filter. The current page no longer matches it.
    pub fn set_filter(&mut self, filter: OrderFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.state = ListState::Stale;
        }
    }

    /// Sets the client-side search term applied by [`visible`](Self::visible).
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    #[must_use]
    pub const fn state(&self) -> &ListState {
        &self.state
    }

    #[must_use]
    pub fn needs_refetch(&self) -> bool {
        matches!(self.state, ListState::Stale)
    }

    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Every order of the last applied page.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Orders of the last page matching the search term.
    pub fn visible(&self) -> impl Iterator<Item = &Order> {
        self.orders
            .iter()
            .filter(|order| order.matches_search(&self.search))
    }

    #[must_use]
    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.orders)
    }

    /// Starts a fetch and returns the ticket its result must carry.
    pub fn begin_fetch(&mut self) -> Ticket {
        self.state = ListState::Loading;
        self.generation.issue()
    }

    /// Applies a fetch result.
    ///
    /// Returns false and leaves the view untouched if `ticket` is no longer
    /// current.
    pub fn apply(&mut self, ticket: Ticket, result: Result<OrderPage, ApiError>) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!("Discarding stale order list result");
            return false;
        }
        match result {
            Ok(page) => {
                self.orders = page.orders;
                self.pagination = page.pagination;
                self.state = ListState::Ready;
            }
            Err(e) => self.state = ListState::Failed(e.to_string()),
        }
        true
    }

    /// Marks the view stale if any of `invalidations` covers it.
    ///
    /// Returns whether a refetch is now needed.
    pub fn invalidate(&mut self, invalidations: &[Invalidation]) -> bool {
        let affected = invalidations.iter().any(|inv| match inv {
            Invalidation::OrderList => true,
            Invalidation::Order(id) => self.orders.iter().any(|order| &order.id == id),
            _ => false,
        });
        if affected {
            self.state = ListState::Stale;
        }
        self.needs_refetch()
    }

    /// Fetches the current filter's page and applies it.
    ///
    /// Returns whether the result was applied.
    pub async fn refresh<H: HttpClient, S: SessionStore>(
        &mut self,
        gateway: &OrdersGateway<H, S>,
    ) -> bool {
        let ticket = self.begin_fetch();
        let result = gateway.list_orders(&self.filter).await;
        self.apply(ticket, result)
    }

    /// Closes the view; results still in flight are discarded.
    pub fn dismiss(&mut self) {
        self.generation.dismiss();
    }
}
