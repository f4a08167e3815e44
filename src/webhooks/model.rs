//! Webhook configuration and delivery records.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

use crate::validation::rule;

/// Event types a webhook can subscribe to.
pub const EVENT_TYPES: [&str; 6] = [
    "cancellation.started",
    "cancellation.completed",
    "cancellation.failed",
    "cancellation.partial",
    "refund.processed",
    "audit.updated",
];

const MAX_RETRIES: u32 = 10;
const MIN_RETRY_DELAY_MS: u64 = 100;
const MAX_RETRY_DELAY_MS: u64 = 3_600_000;
const MIN_BACKOFF: f64 = 1.0;
const MAX_BACKOFF: f64 = 10.0;

const URL_MESSAGE: &str = "Webhook URL must be an absolute http(s) URL";

/// Redelivery policy applied by the backend after a failed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    #[validate(range(max = MAX_RETRIES, message = "Max retries must be between 0 and 10"))]
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    #[validate(range(
        min = MIN_RETRY_DELAY_MS,
        max = MAX_RETRY_DELAY_MS,
        message = "Retry delay must be between 100 ms and 1 hour"
    ))]
    pub retry_delay: u64,
    #[validate(range(
        min = MIN_BACKOFF,
        max = MAX_BACKOFF,
        message = "Backoff multiplier must be between 1 and 10"
    ))]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        #[allow(clippy::cast_precision_loss)]
        let millis = self.retry_delay as f64 * self.backoff_multiplier.powi(exponent);
        Duration::try_from_secs_f64(millis / 1000.0).unwrap_or(Duration::MAX)
    }
}

/// A configured webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    pub name: String,
    pub url: String,
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    pub is_active: bool,
    /// HMAC signing secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default)]
    pub retry_config: RetryConfig,
    #[serde(default)]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /webhooks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhook {
    #[validate(
        length(min = 1, message = "Webhook name is required"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[validate(url(message = "Webhook URL must be an absolute http(s) URL"), custom(function = "http_url"))]
    pub url: String,
    #[validate(
        length(min = 1, message = "Select at least one event"),
        custom(function = "known_events")
    )]
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub retry_config: Option<RetryConfig>,
}

impl CreateWebhook {
    /// A payload with the default retry policy.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>, events: Vec<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            events,
            headers: None,
            secret: None,
            retry_config: Some(RetryConfig::default()),
        }
    }
}

/// Payload for `PUT /webhooks/{id}`. Unset fields are left unchanged and
/// are not validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, message = "Webhook name is required"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Webhook URL must be an absolute http(s) URL"), custom(function = "http_url"))]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, message = "Select at least one event"),
        custom(function = "known_events")
    )]
    pub events: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub retry_config: Option<RetryConfig>,
}

impl UpdateWebhook {
    /// True if the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.url.is_none()
            && self.events.is_none()
            && self.headers.is_none()
            && self.is_active.is_none()
            && self.secret.is_none()
            && self.retry_config.is_none()
    }
}

fn not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(rule("blank", "Webhook name is required"));
    }
    Ok(())
}

/// `url` accepts any scheme; deliveries only go out over http(s).
fn http_url(url: &str) -> Result<(), ValidationError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err(rule("http_url", URL_MESSAGE)),
    }
}

fn known_events(events: &[String]) -> Result<(), ValidationError> {
    if events.iter().any(|e| !EVENT_TYPES.contains(&e.as_str())) {
        return Err(rule("unknown_event", "Unknown event type"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Failed,
    Retrying,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Retrying => "retrying",
        })
    }
}

/// One attempted transmission of an event to a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookDelivery {
    pub id: String,
    pub webhook_id: String,
    pub event_type: String,
    pub status: DeliveryStatus,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_attempt_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub correlation_id: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of `POST /webhooks/{id}/test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestWebhookResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookStats {
    pub total_webhooks: u64,
    pub active_webhooks: u64,
    pub total_deliveries: u64,
    pub successful_deliveries: u64,
    pub failed_deliveries: u64,
    /// Milliseconds.
    pub average_response_time: f64,
}

impl WebhookStats {
    /// Share of deliveries that succeeded, as a percentage. None without deliveries.
    #[must_use]
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_deliveries == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.successful_deliveries as f64 * 100.0 / self.total_deliveries as f64;
        Some(rate)
    }
}
