//! HTTP transport used by the API client.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The transport abstraction ([`HttpClient`])
//! - The production implementation ([`ReqwestClient`])

mod client;
mod error;
mod message;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use message::{HttpClient, HttpRequest, HttpResponse};
