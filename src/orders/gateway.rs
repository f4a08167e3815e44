use serde_json::Value;

use crate::api::{ApiClient, ApiError};
use crate::session::SessionStore;
use crate::transport::HttpClient;
use crate::validation::validate_path_id;
use crate::view::{Invalidation, Mutation};

use super::cancel::{CancelRequest, CancelTarget};
use super::filter::OrderFilter;
use super::model::{OrderPage, OrderWithProducts};

/// Typed access to the order endpoints.
///
/// Keeps no cache: cancellation returns the reads it made stale and the
/// caller refetches.
#[derive(Debug, Clone)]
pub struct OrdersGateway<H, S> {
    api: ApiClient<H, S>,
}

impl<H: HttpClient, S: SessionStore> OrdersGateway<H, S> {
    #[must_use]
    pub const fn new(api: ApiClient<H, S>) -> Self {
        Self { api }
    }

    /// `GET /orders` with the set filter options.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<OrderPage, ApiError> {
        self.api
            .get_with_query::<OrderPage>("/orders", &filter.to_query())
            .await?
            .into_data()
    }

    /// `GET /orders/with-products`: a page of orders joined with their products.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn list_orders_with_products(
        &self,
        filter: &OrderFilter,
    ) -> Result<OrderPage<OrderWithProducts>, ApiError> {
        self.api
            .get_with_query::<OrderPage<OrderWithProducts>>(
                "/orders/with-products",
                &filter.to_query(),
            )
            .await?
            .into_data()
    }

    /// `GET /orders/{id}/with-products`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] if the id does not resolve;
    /// [`ApiError::Validation`] if it cannot be used in a path.
    pub async fn get_order_with_products(
        &self,
        order_id: &str,
    ) -> Result<OrderWithProducts, ApiError> {
        validate_path_id("orderId", order_id)?;
        self.api
            .get::<OrderWithProducts>(&format!("/orders/{order_id}/with-products"))
            .await?
            .into_data()
    }

    /// Cancels `product_ids` of an order on behalf of the signed-in user.
    ///
    /// A single id cancels that product. No id, or several, cancels the
    /// whole order: the backend receives no `productId` either way.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn cancel_order(
        &self,
        order_id: &str,
        pnr: &str,
        product_ids: &[String],
        customer_email: Option<&str>,
    ) -> Result<Mutation<Value>, ApiError> {
        let target = CancelTarget::from_product_ids(product_ids);
        self.cancel(order_id, pnr, &target, customer_email).await
    }

    /// Cancels `target` within an order on behalf of the signed-in user.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn cancel(
        &self,
        order_id: &str,
        pnr: &str,
        target: &CancelTarget,
        customer_email: Option<&str>,
    ) -> Result<Mutation<Value>, ApiError> {
        validate_path_id("orderId", order_id)?;
        let acting = self.api.session().acting_user();
        let request = CancelRequest::new(order_id, pnr, target, customer_email, acting.as_ref());

        tracing::info!(
            order_id,
            pnr,
            product_id = request.product_id.as_deref(),
            source = ?request.request_source,
            "Submitting cancellation"
        );

        let result = self
            .api
            .post::<Value, _>("/orders/cancel", &request)
            .await?
            .into_data_or_default()?;

        Ok(Mutation::new(
            result,
            vec![
                Invalidation::Order(order_id.to_string()),
                Invalidation::OrderList,
            ],
        ))
    }
}
