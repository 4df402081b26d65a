use kingyo_client::Kingyo;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::output::output;

/// Handle `kingyo user`.
pub async fn handle(action: &UserCommands, client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        UserCommands::Me => output(&client.current_user().await?, flags.format),
        UserCommands::List => output(&client.list_users().await?, flags.format),
    }
}
