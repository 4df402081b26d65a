use kingyo_client::Kingyo;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
}

pub fn handle(client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    client.session().sign_out();
    output(&AuthLogoutResponse { cleared: true }, flags.format)
}
