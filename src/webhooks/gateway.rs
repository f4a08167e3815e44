use crate::api::{ApiClient, ApiError};
use crate::session::SessionStore;
use crate::transport::HttpClient;
use crate::validation::{check, validate_path_id};
use crate::view::{Invalidation, Mutation};

use super::model::{
    CreateWebhook, TestWebhookResult, UpdateWebhook, Webhook, WebhookDelivery, WebhookStats,
};

/// Typed access to the webhook endpoints.
///
/// Webhook management is admin-only. The caller checks the role before
/// calling; the backend enforces it.
#[derive(Debug, Clone)]
pub struct WebhooksGateway<H, S> {
    api: ApiClient<H, S>,
}

impl<H: HttpClient, S: SessionStore> WebhooksGateway<H, S> {
    #[must_use]
    pub const fn new(api: ApiClient<H, S>) -> Self {
        Self { api }
    }

    /// `GET /webhooks`. A response without data is an empty list.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>, ApiError> {
        self.api
            .get::<Vec<Webhook>>("/webhooks")
            .await?
            .into_data_or_default()
    }

    /// `GET /webhooks/{id}`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get_webhook(&self, id: &str) -> Result<Webhook, ApiError> {
        validate_path_id("webhookId", id)?;
        self.api
            .get::<Webhook>(&format!("/webhooks/{id}"))
            .await?
            .into_data()
    }

    /// `POST /webhooks`. The payload is validated first.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] for an invalid payload, which is not sent.
    pub async fn create_webhook(
        &self,
        payload: &CreateWebhook,
    ) -> Result<Mutation<Webhook>, ApiError> {
        check(payload)?;
        let created = self
            .api
            .post::<Webhook, _>("/webhooks", payload)
            .await?
            .into_data()?;
        tracing::info!(id = %created.id, name = %created.name, "Webhook created");

        Ok(Mutation::new(
            created,
            vec![Invalidation::WebhookList, Invalidation::WebhookStats],
        ))
    }

    /// `PUT /webhooks/{id}`. The changed fields are validated first.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] for an invalid payload, which is not sent.
    pub async fn update_webhook(
        &self,
        id: &str,
        payload: &UpdateWebhook,
    ) -> Result<Mutation<Webhook>, ApiError> {
        validate_path_id("webhookId", id)?;
        check(payload)?;
        let updated = self
            .api
            .put::<Webhook, _>(&format!("/webhooks/{id}"), payload)
            .await?
            .into_data()?;
        tracing::info!(id, "Webhook updated");

        Ok(Mutation::new(
            updated,
            vec![
                Invalidation::Webhook(id.to_string()),
                Invalidation::WebhookList,
                Invalidation::WebhookStats,
            ],
        ))
    }

    /// `DELETE /webhooks/{id}`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete_webhook(&self, id: &str) -> Result<Mutation<()>, ApiError> {
        validate_path_id("webhookId", id)?;
        let response = self
            .api
            .delete::<serde_json::Value>(&format!("/webhooks/{id}"))
            .await?;
        response.into_data_or_default()?;
        tracing::info!(id, "Webhook deleted");

        Ok(Mutation::new(
            (),
            vec![
                Invalidation::Webhook(id.to_string()),
                Invalidation::WebhookDeliveries(id.to_string()),
                Invalidation::WebhookList,
                Invalidation::WebhookStats,
            ],
        ))
    }

    /// `POST /webhooks/{id}/test`: sends a test event.
    ///
    /// Invalidates nothing.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn test_webhook(&self, id: &str) -> Result<TestWebhookResult, ApiError> {
        validate_path_id("webhookId", id)?;
        self.api
            .post_empty::<TestWebhookResult>(&format!("/webhooks/{id}/test"))
            .await?
            .into_data()
    }

    /// `GET /webhooks/{id}/deliveries`. A response without data is an empty list.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn list_deliveries(&self, id: &str) -> Result<Vec<WebhookDelivery>, ApiError> {
        validate_path_id("webhookId", id)?;
        self.api
            .get::<Vec<WebhookDelivery>>(&format!("/webhooks/{id}/deliveries"))
            .await?
            .into_data_or_default()
    }

    /// `GET /webhooks/stats`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn stats(&self) -> Result<WebhookStats, ApiError> {
        self.api
            .get::<WebhookStats>("/webhooks/stats")
            .await?
            .into_data()
    }
}
