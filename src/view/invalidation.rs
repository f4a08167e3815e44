use std::fmt;

/// A read made stale by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Invalidation {
    OrderList,
    /// Detail of one order (by order id).
    Order(String),
    WebhookList,
    Webhook(String),
    WebhookDeliveries(String),
    WebhookStats,
}

impl fmt::Display for Invalidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderList => f.write_str("orders"),
            Self::Order(id) => write!(f, "order {id}"),
            Self::WebhookList => f.write_str("webhooks"),
            Self::Webhook(id) => write!(f, "webhook {id}"),
            Self::WebhookDeliveries(id) => write!(f, "deliveries of webhook {id}"),
            Self::WebhookStats => f.write_str("webhook stats"),
        }
    }
}

/// Result of a mutating call plus the reads its caller must refresh.
///
/// Gateways keep no cache; acting on `invalidates` is the caller's job.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a mutation lists reads that are now stale"]
pub struct Mutation<T> {
    pub result: T,
    pub invalidates: Vec<Invalidation>,
}

impl<T> Mutation<T> {
    pub const fn new(result: T, invalidates: Vec<Invalidation>) -> Self {
        Self {
            result,
            invalidates,
        }
    }

    /// Whether `read` is among the invalidated reads.
    #[must_use]
    pub fn touches(&self, read: &Invalidation) -> bool {
        self.invalidates.contains(read)
    }

    pub fn into_result(self) -> T {
        self.result
    }
}
