//! The JSON envelope wrapping every backend response.

use serde::{Deserialize, Serialize};

use super::ApiError;

/// `{ success, message, data?, error?, errorCode? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wraps `data` in a successful envelope.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
            error_code: None,
        }
    }

    /// A successful envelope without payload, used for empty 2xx bodies.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            success: true,
            message: None,
            data: None,
            error: None,
            error_code: None,
        }
    }

    /// The most specific human-readable reason carried by the envelope.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Returns the payload of a successful envelope.
    ///
    /// # Errors
    ///
    /// - [`ApiError::ServerRejected`] when `success` is false
    /// - [`ApiError::MissingData`] when a successful envelope has no payload
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::ServerRejected {
                status: http::StatusCode::OK,
                message: self.reason().unwrap_or("Request failed").to_string(),
            });
        }
        self.data.ok_or(ApiError::MissingData)
    }

    /// Like [`into_data`](Self::into_data) but maps a missing payload to `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ServerRejected`] when `success` is false.
    pub fn into_data_or_default(self) -> Result<T, ApiError>
    where
        T: Default,
    {
        match self.into_data() {
            Err(ApiError::MissingData) => Ok(T::default()),
            other => other,
        }
    }
}
