//! Errors surfaced by API calls.

use thiserror::Error;

use crate::session::SessionError;
use crate::transport::HttpError;
use crate::validation::ValidationErrors;

/// Why an API call did not produce the requested data.
///
/// Authentication and authorization failures have already been acted on
/// (session cleared, navigation requested) by the time a caller sees them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: no token, or the token was rejected. The session is gone.
    #[error("Authentication required{}", suffix(.message.as_deref()))]
    AuthenticationRequired {
        /// Reason given by the server, if any.
        message: Option<String>,
    },

    /// 403: authenticated but not allowed. The session is kept.
    #[error("Access denied{}", suffix(.message.as_deref()))]
    AuthorizationDenied {
        /// Reason given by the server, if any.
        message: Option<String>,
    },

    /// Input rejected locally; nothing was sent.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// The entity id did not resolve server-side.
    #[error("Not found: {message}")]
    NotFound {
        /// Reason given by the server.
        message: String,
    },

    /// The request did not complete (connection failure or timeout).
    #[error("Network error: {0}")]
    Network(#[from] HttpError),

    /// The server answered with a failure.
    #[error("{message}")]
    ServerRejected {
        /// HTTP status of the response.
        status: http::StatusCode,
        /// Reason given by the server, or a generic message.
        message: String,
    },

    /// A successful envelope carried no payload where one was required.
    #[error("Response contained no data")]
    MissingData,

    /// The response body was not the expected JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be encoded.
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The session could not be persisted.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// True for errors the API client has already handled globally.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationRequired { .. } | Self::AuthorizationDenied { .. }
        )
    }

    /// True if the request did not complete and may simply be retried.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// The server-provided reason, where there is one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::AuthenticationRequired { message } | Self::AuthorizationDenied { message } => {
                message.as_deref()
            }
            Self::NotFound { message } | Self::ServerRejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

fn suffix(message: Option<&str>) -> String {
    message.map_or_else(String::new, |m| format!(": {m}"))
}
