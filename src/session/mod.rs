//! Client session persistence and in-memory auth state.
//!
//! A session is a bearer token together with the user it was issued to.
//! The pair is always written and cleared as one unit so a reader never
//! sees a token without its user or the reverse.

mod file;
mod memory;
mod user;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use user::{Role, User};

use std::io;
use std::sync::{PoisonError, RwLock};

use thiserror::Error;

/// A bearer token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    /// Creates a session from a token and user.
    #[must_use]
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Which half of a persisted session is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPart {
    Token,
    User,
}

/// Result of loading a session from persistent storage.
#[derive(Debug, Clone)]
pub enum LoadResult {
    /// Both token and user were present.
    Loaded(Session),

    /// Nothing is stored (never logged in, or logged out).
    NotFound,

    /// Only one half of the pair is stored. Treated as logged out.
    Incomplete {
        /// The half that is absent.
        missing: MissingPart,
    },

    /// Stored data exists but could not be parsed.
    Corrupted {
        /// Reason for corruption (for logging/debugging).
        reason: String,
    },
}

impl LoadResult {
    /// Returns the session if one was fully loaded.
    #[must_use]
    pub fn into_session(self) -> Option<Session> {
        match self {
            Self::Loaded(session) => Some(session),
            Self::NotFound | Self::Incomplete { .. } | Self::Corrupted { .. } => None,
        }
    }
}

/// Errors that can occur while writing or clearing the persisted session.
///
/// Read-side problems are modeled as [`LoadResult`] variants instead.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Failed to write or remove the session file.
    #[error("Failed to write session file: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize the session.
    #[error("Failed to serialize session: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Persistent storage for the client session.
///
/// Implementations must store token and user together: `save` replaces
/// both in one write and `clear` removes both.
pub trait SessionStore: Send + Sync {
    /// Loads the persisted session.
    fn load(&self) -> LoadResult;

    /// Persists `session`, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Removes any persisted session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if stored data exists but cannot be removed.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Authentication state of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The initial check against the backend has not completed yet.
    Checking,
    /// A validated session is active.
    Authenticated(Session),
    /// No session.
    Unauthenticated,
}

impl AuthState {
    /// Returns the active session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Checking | Self::Unauthenticated => None,
        }
    }

    /// Returns the active user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub const fn is_checking(&self) -> bool {
        matches!(self, Self::Checking)
    }
}

/// The single owner of session state for one client instance.
///
/// Holds the persistent store and the in-memory [`AuthState`]. Shared
/// between the API client and the auth manager behind an `Arc`.
#[derive(Debug)]
pub struct SessionContext<S> {
    store: S,
    state: RwLock<AuthState>,
}

impl<S: SessionStore> SessionContext<S> {
    /// Creates a context in the [`AuthState::Checking`] state.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: RwLock::new(AuthState::Checking),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns a snapshot of the current auth state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the user of the active session, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    /// Returns the persisted session, if a complete one is stored.
    ///
    /// This is what requests are authenticated with, whether or not the
    /// initial check has completed.
    #[must_use]
    pub fn stored(&self) -> Option<Session> {
        self.store.load().into_session()
    }

    /// Returns the persisted bearer token, if a complete session is stored.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.stored().map(|s| s.token)
    }

    /// Returns the user the persisted token belongs to.
    ///
    /// Requests act on behalf of this user; unlike
    /// [`current_user`](Self::current_user) it is available before the
    /// initial check.
    #[must_use]
    pub fn acting_user(&self) -> Option<User> {
        self.stored().map(|s| s.user)
    }

    /// Persists `session` and marks the client authenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted; the in-memory
    /// state is left unchanged in that case.
    pub fn establish(&self, session: Session) -> Result<(), SessionError> {
        self.store.save(&session)?;
        tracing::info!(user = %session.user.email, role = %session.user.role, "Session established");
        self.set_state(AuthState::Authenticated(session));
        Ok(())
    }

    /// Drops the session from storage and memory.
    ///
    /// Idempotent. A failure to remove the stored data is logged; the
    /// in-memory state is cleared regardless.
    pub fn invalidate(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear persisted session: {e}");
        }
        let was_authenticated = self.state().is_authenticated();
        self.set_state(AuthState::Unauthenticated);
        if was_authenticated {
            tracing::info!("Session cleared");
        }
    }

    fn set_state(&self, next: AuthState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}
