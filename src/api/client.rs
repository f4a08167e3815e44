//! The authenticated API client.

use std::fmt;
use std::sync::Arc;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::route::{Navigator, Route};
use crate::session::{SessionContext, SessionStore};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

use super::{ApiError, ApiResponse};

/// Issues requests against the backend on behalf of the current session.
///
/// # Credentials
///
/// Every request carries `Authorization: Bearer <token>` when a complete
/// session is persisted. Without one the request goes out anonymously
/// and the server decides.
///
/// # Global response policy
///
/// - 401: the session is cleared from storage and memory, the navigator
///   is sent to [`Route::Login`], and [`ApiError::AuthenticationRequired`]
///   is returned.
/// - 403: the navigator is sent to [`Route::Unauthorized`]; the session
///   is kept. [`ApiError::AuthorizationDenied`] is returned.
pub struct ApiClient<H, S> {
    http: H,
    base_url: Url,
    session: Arc<SessionContext<S>>,
    navigator: Arc<dyn Navigator>,
}

impl<H: Clone, S> Clone for ApiClient<H, S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            session: Arc::clone(&self.session),
            navigator: Arc::clone(&self.navigator),
        }
    }
}

impl<H: fmt::Debug, S> fmt::Debug for ApiClient<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("http", &self.http)
            .field("base_url", &self.base_url.as_str())
            .field("navigator", &self.navigator)
            .finish_non_exhaustive()
    }
}

impl<H, S> ApiClient<H, S> {
    /// Creates a client for the backend at `base_url`.
    #[must_use]
    pub fn new(
        http: H,
        base_url: Url,
        session: Arc<SessionContext<S>>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            base_url,
            session,
            navigator,
        }
    }

    /// Returns the backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the shared session context.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionContext<S>> {
        &self.session
    }

    /// Returns the navigator used for forced redirects.
    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Resolves `path` (starting with `/`) against the base URL and appends `query`.
    ///
    /// A path prefix on the base URL (`https://host/api`) is preserved.
    /// Each `/`-separated piece of `path` becomes one percent-encoded
    /// segment, so an id can never climb out of its route.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] with [`HttpError::InvalidUrl`] if the
    /// base URL cannot take a path.
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| HttpError::InvalidUrl(format!("{}: cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        url.set_query(None);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

impl<H: HttpClient, S: SessionStore> ApiClient<H, S> {
    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.send(Method::GET, path, &[], None).await
    }

    /// `GET path?query`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(Method::GET, path, query, None).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        let body = serde_json::to_vec(body).map_err(ApiError::Encode)?;
        self.send(Method::POST, path, &[], Some(body)).await
    }

    /// `POST path` without a body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(Method::POST, path, &[], None).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        let body = serde_json::to_vec(body).map_err(ApiError::Encode)?;
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.send(Method::DELETE, path, &[], None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let request = self.build_request(method, path, query, body)?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            authenticated = request.bearer_token().is_some(),
            "API request"
        );

        let response = self.http.request(request).await?;
        tracing::debug!(status = %response.status, "API response");

        self.handle_response(response)
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint(path, query)?;
        let mut request = HttpRequest::new(method, url)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_header(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.token() {
            // A token with bytes not allowed in a header is sent without credentials.
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => request = request.with_header(AUTHORIZATION, value),
                Err(_) => tracing::warn!("Stored token is not a valid header value; sending anonymously"),
            }
        }

        if let Some(body) = body {
            request = request.with_body(body);
        }

        Ok(request)
    }

    fn handle_response<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<T>, ApiError> {
        let status = response.status;

        if status.is_success() {
            if response.body.iter().all(u8::is_ascii_whitespace) {
                return Ok(ApiResponse::empty());
            }
            return serde_json::from_slice(&response.body).map_err(ApiError::Decode);
        }

        let message = failure_reason(&response);

        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("Backend rejected credentials; clearing session");
                self.session.invalidate();
                self.navigator.navigate(Route::Login);
                Err(ApiError::AuthenticationRequired { message })
            }
            StatusCode::FORBIDDEN => {
                tracing::warn!("Backend denied access");
                self.navigator.navigate(Route::Unauthorized);
                Err(ApiError::AuthorizationDenied { message })
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound {
                message: message.unwrap_or_else(|| "Resource not found".to_string()),
            }),
            _ => Err(ApiError::ServerRejected {
                status,
                message: message
                    .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
            }),
        }
    }
}

/// Pulls the reason out of a failed response's envelope, if it has one.
fn failure_reason(response: &HttpResponse) -> Option<String> {
    serde_json::from_slice::<ApiResponse<serde_json::Value>>(&response.body)
        .ok()
        .and_then(|envelope| envelope.reason().map(ToString::to_string))
}
