//! Navigation intents sent to the host.

use std::sync::{Mutex, PoisonError};

/// Symbolic route names the session can ask the host to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
}

impl Route {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
        }
    }
}

/// Receives navigation intents. The host owns the actual routes.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Records every intent; useful for hosts that poll and for tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn visits(&self) -> Vec<Route> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = route.name(), "navigation requested");
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
