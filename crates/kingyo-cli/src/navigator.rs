use kingyo_auth::{Navigator, Route};

/// Turns the session's "show the login screen" intent into a terminal hint.
#[derive(Debug, Clone, Copy)]
pub struct LoginHint {
    quiet: bool,
}

impl LoginHint {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    #[must_use]
    pub const fn message(route: Route) -> &'static str {
        match route {
            Route::Login => "session ended; run `kingyo auth login` to sign in again",
        }
    }
}

impl Navigator for LoginHint {
    fn navigate(&self, route: Route) {
        tracing::info!(route = route.name(), "navigation requested");
        if !self.quiet {
            eprintln!("{}", Self::message(route));
        }
    }
}
