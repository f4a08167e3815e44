//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::api::ApiClient;
use crate::route::RecordingNavigator;
use crate::session::{MemorySessionStore, Role, Session, SessionContext, User};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Mock transport replaying a queue of canned results and recording requests.
#[derive(Debug, Default)]
pub struct MockHttp {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a JSON response.
    pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
        let status = http::StatusCode::from_u16(status).unwrap();
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::json(status, &body)));
        self
    }

    /// Queues a response with a raw body.
    pub fn respond_raw(&self, status: u16, body: &[u8]) -> &Self {
        let status = http::StatusCode::from_u16(status).unwrap();
        self.responses.lock().unwrap().push_back(Ok(HttpResponse::new(
            status,
            http::HeaderMap::new(),
            body.to_vec(),
        )));
        self
    }

    /// Queues a `{"success": true, "data": ...}` response.
    pub fn respond_ok(&self, data: serde_json::Value) -> &Self {
        self.respond(200, serde_json::json!({ "success": true, "message": "ok", "data": data }))
    }

    /// Queues a transport failure.
    pub fn fail(&self, error: HttpError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    /// Body of the most recent request parsed as JSON.
    pub fn last_body(&self) -> serde_json::Value {
        let body = self.last_request().body.expect("request had no body");
        serde_json::from_slice(&body).unwrap()
    }
}

impl HttpClient for Arc<MockHttp> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request: no response queued")
    }
}

/// An API client wired to a mock transport, an in-memory store and a recording navigator.
pub struct Harness {
    pub http: Arc<MockHttp>,
    pub navigator: Arc<RecordingNavigator>,
    pub session: Arc<SessionContext<MemorySessionStore>>,
    pub api: ApiClient<Arc<MockHttp>, MemorySessionStore>,
}

impl Harness {
    pub fn with_store(store: MemorySessionStore) -> Self {
        let http = MockHttp::new();
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Arc::new(SessionContext::new(store));
        let api = ApiClient::new(
            Arc::clone(&http),
            url::Url::parse("http://localhost:8080").unwrap(),
            Arc::clone(&session),
            navigator.clone(),
        );
        Self {
            http,
            navigator,
            session,
            api,
        }
    }

    pub fn anonymous() -> Self {
        Self::with_store(MemorySessionStore::new())
    }

    /// A harness whose session is already established for `user`.
    pub fn signed_in(user: User) -> Self {
        let harness = Self::anonymous();
        harness
            .session
            .establish(Session::new("token-abc", user))
            .unwrap();
        harness
    }
}

pub fn user_with_role(role: Role) -> User {
    User::new("user-1", "agent@arcube.com", role)
}

pub fn admin() -> User {
    User::new("admin-1", "admin@arcube.com", Role::Admin)
}

/// Wire form of an order with the given id and status.
pub fn order_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "pnr": format!("PNR{id}"),
        "transactionId": format!("tx-{id}"),
        "customer": {
            "email": "jane.doe@example.com",
            "firstName": "Jane",
            "lastName": "Doe"
        },
        "products": ["p1", "p2"],
        "segments": [{
            "segmentId": "s1",
            "flightNumber": "EK202",
            "departure": "DXB",
            "arrival": "JFK",
            "departureTime": "2026-11-01T08:00:00Z",
            "arrivalTime": "2026-11-01T16:00:00Z",
            "operatingCarrier": "EK",
            "passengerIds": ["pax-1"]
        }],
        "status": status,
        "totalAmount": 120.5,
        "totalCurrency": "USD",
        "createdAt": "2026-10-01T10:00:00Z",
        "updatedAt": "2026-10-02T10:00:00Z"
    })
}

/// Wire form of a product with a 72h/100%, 24h/50% policy.
pub fn product_json(id: &str, status: &str, can_cancel: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": "Airport lounge",
        "provider": "LoungeCo",
        "type": "lounge",
        "price": { "amount": 80.0, "currency": "USD" },
        "status": status,
        "cancellationPolicy": {
            "windows": [
                { "hoursBeforeService": 72, "refundPercentage": 100.0, "description": "Full refund" },
                { "hoursBeforeService": 24, "refundPercentage": 50.0, "description": "Half refund" }
            ],
            "canCancel": can_cancel
        },
        "serviceDateTime": "2026-11-01T06:00:00Z",
        "metadata": { "terminal": "3" }
    })
}

/// Wire form of one page of orders.
pub fn page_json(orders: Vec<serde_json::Value>) -> serde_json::Value {
    let total = orders.len();
    serde_json::json!({
        "orders": orders,
        "pagination": { "page": 1, "limit": 10, "total": total, "totalPages": 1 }
    })
}
