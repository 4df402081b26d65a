use chrono::{DateTime, Utc};
use kingyo_auth::{SessionState, TokenStatus};
use kingyo_client::Kingyo;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    #[serde(flatten)]
    tokens: TokenStatus,
    note: Option<&'static str>,
}

pub fn handle(client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&describe(client.session().status(), Utc::now()), flags.format)
}

fn describe(tokens: TokenStatus, now: DateTime<Utc>) -> AuthStatusResponse {
    let authenticated = tokens.session == SessionState::Authenticated;
    let note = if !authenticated {
        Some("no stored access token; run `kingyo auth login`")
    } else if tokens.access_expires_at.is_some_and(|at| at <= now) {
        Some("access token expired; it is refreshed on the next request")
    } else {
        None
    };
    AuthStatusResponse {
        authenticated,
        tokens,
        note,
    }
}
