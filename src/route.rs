//! Views the client can be sent to, and the hook that performs the move.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A top-level view of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Order list (the landing view).
    Orders,
    Dashboard,
    Webhooks,
    Profile,
    Login,
    /// Shown when the backend answers 403.
    Unauthorized,
}

impl Route {
    /// Returns the path of the view.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Orders => "/",
            Self::Dashboard => "/dashboard",
            Self::Webhooks => "/webhooks",
            Self::Profile => "/profile",
            Self::Login => "/login",
            Self::Unauthorized => "/unauthorized",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Performs a forced navigation requested by the client.
///
/// The API client calls this on 401 and 403 responses; the auth manager's
/// redirect policy returns routes for the caller to hand to it.
pub trait Navigator: Send + Sync + fmt::Debug {
    fn navigate(&self, route: Route);
}

/// A navigator that records every requested route.
///
/// The CLI inspects the record after a command to print a hint; tests use
/// it to assert on redirects.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every route navigated to, oldest first.
    #[must_use]
    pub fn visited(&self) -> Vec<Route> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent route, if any.
    #[must_use]
    pub fn last(&self) -> Option<Route> {
        self.visited().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "Navigating");
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_match_console_views() {
        assert_eq!(Route::Orders.path(), "/");
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Unauthorized.path(), "/unauthorized");
        assert_eq!(Route::Webhooks.to_string(), "/webhooks");
    }

    #[test]
    fn recording_navigator_keeps_order() {
        let nav = RecordingNavigator::new();
        assert!(nav.last().is_none());

        nav.navigate(Route::Unauthorized);
        nav.navigate(Route::Login);

        assert_eq!(nav.visited(), vec![Route::Unauthorized, Route::Login]);
        assert_eq!(nav.last(), Some(Route::Login));
    }

    #[test]
    fn navigator_is_object_safe() {
        let nav: Box<dyn Navigator> = Box::new(RecordingNavigator::new());
        nav.navigate(Route::Orders);
    }
}
