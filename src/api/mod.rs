//! Authenticated access to the platform's REST API.
//!
//! This module provides:
//! - The response envelope shared by every endpoint ([`ApiResponse`])
//! - The error taxonomy surfaced to callers ([`ApiError`])
//! - The client that attaches credentials and applies the global
//!   401/403 policy ([`ApiClient`])

mod client;
mod envelope;
mod error;


pub use client::ApiClient;
pub use envelope::ApiResponse;
pub use error::ApiError;
