//! Arcube Console: admin client for the order/cancellation platform
//!
//! A library for signing in to the backend, browsing and cancelling
//! orders, and managing webhook notifications, with a persisted session.

pub mod api;
pub mod auth;
pub mod config;
pub mod orders;
pub mod route;
pub mod session;
pub mod time;
pub mod transport;
pub mod validation;
pub mod view;
pub mod webhooks;

#[cfg(test)]
mod test_support;
