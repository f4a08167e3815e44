//! Wire-level request and response values and the transport trait.

use super::HttpError;

/// One call to the admin API, as assembled by the API client.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: http::Method,
    /// Fully resolved endpoint, query included.
    pub url: url::Url,
    /// JSON content negotiation and the bearer token, when signed in.
    pub headers: http::HeaderMap,
    /// Serialized JSON payload for POST and PUT.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// A request with no headers and no payload.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    /// Attaches an encoded payload.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a header; an existing value for `name` is kept.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Returns the bearer token carried in the `Authorization` header, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

/// What the backend answered, read to the end.
///
/// Every status lands here, 4xx and 5xx included. The API client decides
/// which ones end the session or become errors.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: http::StatusCode,
    pub headers: http::HeaderMap,
    /// Raw envelope bytes; may be empty or not JSON at all.
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// An `application/json` response, as the admin API sends them.
    #[must_use]
    pub fn json(status: http::StatusCode, body: &serde_json::Value) -> Self {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        Self::new(status, headers, body.to_string().into_bytes())
    }
}

/// Sends requests for the API client.
///
/// [`ReqwestClient`](super::ReqwestClient) talks to the real backend; tests
/// queue canned envelopes in a recording double instead. The returned future
/// is `Send` so one client can serve gateways on a multi-threaded runtime.
pub trait HttpClient: Send + Sync {
    /// Performs one round trip.
    ///
    /// # Errors
    ///
    /// Only failures to get an answer: [`HttpError::Connection`],
    /// [`HttpError::Timeout`] or [`HttpError::InvalidUrl`]. Error statuses
    /// come back as `Ok`.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
