//! Webhook gateway: configuration CRUD, test sends and delivery history.

mod gateway;
mod model;


pub use gateway::WebhooksGateway;
pub use model::{
    CreateWebhook, DeliveryStatus, EVENT_TYPES, RetryConfig, TestWebhookResult, UpdateWebhook,
    Webhook, WebhookDelivery, WebhookStats,
};
