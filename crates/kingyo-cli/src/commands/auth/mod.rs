mod login;
mod logout;
mod refresh;
mod status;

use kingyo_client::Kingyo;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `kingyo auth <subcommand>`.
pub async fn handle(action: &AuthCommands, client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, client, flags).await,
        AuthCommands::Logout => logout::handle(client, flags),
        AuthCommands::Refresh => refresh::handle(client, flags).await,
        AuthCommands::Status => status::handle(client, flags),
    }
}
