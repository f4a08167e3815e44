//! The auth session manager.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError, ApiResponse};
use crate::route::Route;
use crate::session::{AuthState, LoadResult, Session, SessionStore, User};
use crate::transport::HttpClient;
use crate::validation::{LoginForm, check};

/// Fallback shown when a login fails without a server-provided reason.
const LOGIN_FAILED: &str = "Login failed";

/// Result of a login attempt. Login never returns an error past this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(User),
    Failure {
        /// Human-readable reason.
        message: String,
    },
}

impl LoginOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The failure reason, if the attempt failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { message } => Some(message),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginData {
    token: String,
    user: User,
}

/// Owns the auth lifecycle of one client instance.
///
/// # State machine
///
/// ```text
/// Checking ──profile ok──────────────▶ Authenticated
///    │                                     │
///    └──no token / profile failed──▶ Unauthenticated ◀── logout / any 401
///                                          │
///                                          └──login ok──▶ Authenticated
/// ```
///
/// `Checking` is left at most once per instance: [`check_auth`](Self::check_auth)
/// after the first completion returns the current state unchanged.
#[derive(Debug, Clone)]
pub struct AuthManager<H, S> {
    api: ApiClient<H, S>,
}

impl<H: HttpClient, S: SessionStore> AuthManager<H, S> {
    #[must_use]
    pub const fn new(api: ApiClient<H, S>) -> Self {
        Self { api }
    }

    /// Returns the API client the manager authenticates.
    #[must_use]
    pub const fn api(&self) -> &ApiClient<H, S> {
        &self.api
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.api.session().state()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Returns the signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.api.session().current_user()
    }

    /// Resolves the initial [`AuthState::Checking`] state.
    ///
    /// Without a complete persisted session the client becomes
    /// unauthenticated without contacting the backend. Otherwise the token
    /// is validated against the profile endpoint; the server's user record
    /// replaces the stored one on success, and any failure clears the
    /// session entirely.
    pub async fn check_auth(&self) -> AuthState {
        let session = self.api.session();
        if !session.state().is_checking() {
            return session.state();
        }

        let stored = match session.store().load() {
            LoadResult::Loaded(stored) => stored,
            LoadResult::NotFound => {
                tracing::debug!("No stored session");
                session.invalidate();
                return session.state();
            }
            LoadResult::Incomplete { missing } => {
                tracing::info!(?missing, "Stored session is incomplete; signing out");
                session.invalidate();
                return session.state();
            }
            LoadResult::Corrupted { reason } => {
                tracing::warn!("Stored session is unreadable ({reason}); signing out");
                session.invalidate();
                return session.state();
            }
        };

        match self.fetch_profile().await {
            Ok(user) => {
                if let Err(e) = session.establish(Session::new(stored.token, user)) {
                    tracing::warn!("Failed to persist refreshed profile: {e}");
                    session.invalidate();
                }
            }
            Err(e) => {
                tracing::info!("Stored session rejected: {e}");
                session.invalidate();
            }
        }

        session.state()
    }

    async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.api.get::<User>("/auth/profile").await?.into_data()
    }

    /// Signs in with the given credentials.
    ///
    /// The form is validated first; invalid input is reported without
    /// contacting the backend. On success the token and user are
    /// persisted together and the client becomes authenticated.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        if let Err(errors) = check(&LoginForm::new(email, password)) {
            return LoginOutcome::failure(errors.to_string());
        }

        let response = match self
            .api
            .post::<LoginData, _>("/auth/login", &Credentials { email, password })
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::info!("Login request failed: {e}");
                return LoginOutcome::failure(e.server_message().unwrap_or(LOGIN_FAILED));
            }
        };

        let data = match response {
            ApiResponse {
                success: true,
                data: Some(data),
                ..
            } => data,
            rejected => {
                return LoginOutcome::failure(rejected.error.as_deref().unwrap_or(LOGIN_FAILED));
            }
        };

        let user = data.user.clone();
        match self.api.session().establish(Session::new(data.token, data.user)) {
            Ok(()) => LoginOutcome::Success(user),
            Err(e) => {
                tracing::warn!("Failed to persist session: {e}");
                LoginOutcome::failure(LOGIN_FAILED)
            }
        }
    }

    /// Signs out. Clears the persisted pair and the in-memory session.
    ///
    /// Idempotent.
    pub fn logout(&self) {
        self.api.session().invalidate();
    }

    /// Where a caller showing `current` must go, if anywhere.
    ///
    /// Only once the initial check has completed without a session, and
    /// only when not already on the login view.
    #[must_use]
    pub fn redirect_for(&self, current: Route) -> Option<Route> {
        match self.state() {
            AuthState::Unauthenticated if current != Route::Login => Some(Route::Login),
            _ => None,
        }
    }
}
