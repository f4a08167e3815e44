//! Cancellation request sent to `POST /orders/cancel`.

use serde::{Deserialize, Serialize};

use crate::session::{Role, User};

/// Reason attached to every cancellation issued from the console.
pub const CANCEL_REASON: &str = "Customer request";

/// `userId` sent when no acting user is known.
pub const UNKNOWN_USER_ID: &str = "unknown";

/// Channel a cancellation originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestSource {
    CustomerApp,
    AdminPanel,
    PartnerApi,
    System,
}

/// Role reported in `requestedBy.userRole`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequesterRole {
    Customer,
    Admin,
    CustomerService,
    Partner,
    System,
}

/// Maps the acting role to its request source and normalized role.
///
/// Every role maps to exactly one pair; unrecognized roles are treated as
/// customers.
#[must_use]
pub const fn request_origin(role: &Role) -> (RequestSource, RequesterRole) {
    match role {
        Role::Admin => (RequestSource::AdminPanel, RequesterRole::Admin),
        Role::CustomerService => (RequestSource::AdminPanel, RequesterRole::CustomerService),
        Role::Partner => (RequestSource::PartnerApi, RequesterRole::Partner),
        Role::System => (RequestSource::System, RequesterRole::System),
        Role::Customer | Role::Other(_) => (RequestSource::CustomerApp, RequesterRole::Customer),
    }
}

/// What a cancellation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelTarget {
    /// No `productId` is sent; the backend cancels the whole order.
    WholeOrder,
    Product(String),
}

impl CancelTarget {
    /// Exactly one id targets that product; none or several target the
    /// whole order.
    #[must_use]
    pub fn from_product_ids(ids: &[String]) -> Self {
        match ids {
            [id] => Self::Product(id.clone()),
            [] => Self::WholeOrder,
            many => {
                tracing::warn!(
                    count = many.len(),
                    "Several products selected; the request cancels the whole order"
                );
                Self::WholeOrder
            }
        }
    }

    #[must_use]
    pub fn product_id(&self) -> Option<&str> {
        match self {
            Self::WholeOrder => None,
            Self::Product(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIdentifier {
    pub order_id: String,
    pub pnr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub source: RequestSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedBy {
    pub user_id: String,
    pub user_role: RequesterRole,
    pub metadata: RequesterMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub order_identifier: OrderIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub request_source: RequestSource,
    pub reason: String,
    pub requested_by: RequestedBy,
}

impl CancelRequest {
    /// Builds the request on behalf of `acting`.
    ///
    /// The identifying email is `customer_email` if given and not blank,
    /// else the acting user's. Without an acting user the request is
    /// attributed to an unknown customer.
    #[must_use]
    pub fn new(
        order_id: impl Into<String>,
        pnr: impl Into<String>,
        target: &CancelTarget,
        customer_email: Option<&str>,
        acting: Option<&User>,
    ) -> Self {
        let (source, role) = acting.map_or(
            (RequestSource::CustomerApp, RequesterRole::Customer),
            |user| request_origin(&user.role),
        );
        let acting_email = acting.map(|user| user.email.clone());
        let email = customer_email
            .filter(|email| !email.trim().is_empty())
            .map(ToString::to_string)
            .or_else(|| acting_email.clone());

        Self {
            order_identifier: OrderIdentifier {
                order_id: order_id.into(),
                pnr: pnr.into(),
                email,
            },
            product_id: target.product_id().map(ToString::to_string),
            request_source: source,
            reason: CANCEL_REASON.to_string(),
            requested_by: RequestedBy {
                user_id: acting
                    .map_or_else(|| UNKNOWN_USER_ID.to_string(), |user| user.id.clone()),
                user_role: role,
                metadata: RequesterMetadata {
                    email: acting_email,
                    source,
                },
            },
        }
    }
}
