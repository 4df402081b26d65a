use anyhow::Context;
use kingyo_client::Kingyo;

use crate::cli::GlobalFlags;
use crate::output::output;

pub async fn handle(client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    client
        .session()
        .refresh()
        .await
        .context("auth refresh")?;
    output(&client.session().status(), flags.format)
}
