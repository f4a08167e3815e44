//! In-memory session persistence.

use std::sync::{PoisonError, RwLock};

use super::{LoadResult, MissingPart, Session, SessionError, SessionStore, User};

/// A [`SessionStore`] that keeps the pair in process memory.
///
/// Useful for embedding the client where nothing should touch disk, and
/// in tests. Both halves sit behind a single lock.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slots: RwLock<(Option<String>, Option<User>)>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self::with_parts(Some(session.token), Some(session.user))
    }

    /// Creates a store holding arbitrary halves, including incomplete pairs.
    #[must_use]
    pub const fn with_parts(token: Option<String>, user: Option<User>) -> Self {
        Self {
            slots: RwLock::new((token, user)),
        }
    }

    /// Returns the raw stored halves.
    #[must_use]
    pub fn parts(&self) -> (Option<String>, Option<User>) {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> LoadResult {
        match self.parts() {
            (Some(token), Some(user)) => LoadResult::Loaded(Session::new(token, user)),
            (None, None) => LoadResult::NotFound,
            (None, Some(_)) => LoadResult::Incomplete {
                missing: MissingPart::Token,
            },
            (Some(_), None) => LoadResult::Incomplete {
                missing: MissingPart::User,
            },
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.slots.write().unwrap_or_else(PoisonError::into_inner) =
            (Some(session.token.clone()), Some(session.user.clone()));
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slots.write().unwrap_or_else(PoisonError::into_inner) = (None, None);
        Ok(())
    }
}
