//! Order and product records as returned by the backend.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an order. Transitions happen server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
    Refunded,
    Expired,
}

impl OrderStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Refunded,
        Self::Expired,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when parsing an unknown order status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown order status '{0}': expected pending, confirmed, cancelled, refunded or expired")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A monetary amount in a currency (ISO 4217 code).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

impl Money {
    #[must_use]
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Customer {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSegment {
    pub segment_id: String,
    pub flight_number: String,
    pub departure: String,
    pub arrival: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub operating_carrier: String,
    #[serde(default)]
    pub passenger_ids: Vec<String>,
}

/// Denormalized summary some list endpoints attach to each order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub pnr: String,
    pub customer_name: String,
    pub product_count: u32,
    pub total_amount: f64,
    pub total_currency: String,
    pub status: String,
}

/// A booking identified by id and PNR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub pnr: String,
    #[serde(default)]
    pub transaction_id: String,
    pub customer: Customer,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub segments: Vec<FlightSegment>,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_summary: Option<OrderSummary>,
}

impl Order {
    /// The order total, when the backend provided both amount and currency.
    #[must_use]
    pub fn total(&self) -> Option<Money> {
        match (self.total_amount, &self.total_currency) {
            (Some(amount), Some(currency)) => Some(Money::new(amount, currency.clone())),
            _ => None,
        }
    }

    /// Case-insensitive match of `term` against PNR, customer name and email.
    ///
    /// An empty term matches every order.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            &self.pnr,
            &self.customer.first_name,
            &self.customer.last_name,
            &self.customer.email,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Pending,
    Cancelled,
    Expired,
}

impl ProductStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Refund granted when cancelling at least `hours_before_service` ahead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationWindow {
    pub hours_before_service: u32,
    pub refund_percentage: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPolicy {
    #[serde(default)]
    pub windows: Vec<CancellationWindow>,
    pub can_cancel: bool,
}

impl CancellationPolicy {
    /// The window that applies when cancelling `hours_before` ahead of service.
    ///
    /// That is the window with the largest threshold not exceeding
    /// `hours_before`. None once no threshold is met, including after the
    /// service time has passed.
    #[must_use]
    pub fn window_for(&self, hours_before: f64) -> Option<&CancellationWindow> {
        if hours_before < 0.0 {
            return None;
        }
        self.windows
            .iter()
            .filter(|w| f64::from(w.hours_before_service) <= hours_before)
            .max_by_key(|w| w.hours_before_service)
    }

    /// Refund percentage for cancelling `hours_before` ahead; 0 when no window applies.
    #[must_use]
    pub fn refund_percentage(&self, hours_before: f64) -> f64 {
        self.window_for(hours_before)
            .map_or(0.0, |w| w.refund_percentage)
    }
}

/// What a product cancellation would refund right now.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundEstimate {
    pub percentage: f64,
    pub amount: Money,
    /// Hours left until service at the time of the estimate.
    pub hours_before_service: f64,
}

/// A purchasable item attached to an order (eSIM, lounge access, transfer...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub price: Money,
    pub status: ProductStatus,
    pub cancellation_policy: CancellationPolicy,
    pub service_date_time: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Product {
    /// A product can be cancelled only if its policy allows it and it is not
    /// cancelled already.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        self.cancellation_policy.can_cancel && self.status != ProductStatus::Cancelled
    }

    /// Estimated refund for cancelling at `now`. None if not cancellable.
    #[must_use]
    pub fn refund_estimate(&self, now: DateTime<Utc>) -> Option<RefundEstimate> {
        if !self.is_cancellable() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let hours = (self.service_date_time - now).num_seconds() as f64 / 3600.0;
        let percentage = self.cancellation_policy.refund_percentage(hours);
        Some(RefundEstimate {
            percentage,
            amount: Money::new(
                self.price.amount * percentage / 100.0,
                self.price.currency.clone(),
            ),
            hours_before_service: hours,
        })
    }
}

/// An order joined with its full product records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithProducts {
    pub order: Order,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl OrderWithProducts {
    /// Products that may still be cancelled.
    pub fn cancellable_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_cancellable())
    }

    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            total: 0,
            total_pages: 0,
        }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPage<T = Order> {
    #[serde(default = "Vec::new")]
    pub orders: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Number of orders per status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts(BTreeMap<OrderStatus, usize>);

impl StatusCounts {
    /// Counts the given orders by status.
    pub fn tally<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut counts = BTreeMap::new();
        for order in orders {
            *counts.entry(order.status).or_insert(0) += 1;
        }
        Self(counts)
    }

    #[must_use]
    pub fn get(&self, status: OrderStatus) -> usize {
        self.0.get(&status).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}
