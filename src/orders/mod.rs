//! Orders gateway: listing, detail and cancellation.

mod cancel;
mod filter;
mod gateway;
mod model;

#[cfg(test)]
mod model_tests;

pub use cancel::{
    CANCEL_REASON, CancelRequest, CancelTarget, OrderIdentifier, RequestSource, RequestedBy,
    RequesterMetadata, RequesterRole, UNKNOWN_USER_ID, request_origin,
};
pub use filter::OrderFilter;
pub use gateway::OrdersGateway;
pub use model::{
    CancellationPolicy, CancellationWindow, Customer, FlightSegment, Money, Order, OrderPage,
    OrderStatus, OrderSummary, OrderWithProducts, Pagination, Product, ProductStatus,
    RefundEstimate, StatusCounts, UnknownStatus,
};
