use kingyo_client::Kingyo;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => commands::auth::handle(&action, client, flags).await,
        Commands::Plan { action } => commands::plan::handle(&action, client, flags).await,
        Commands::Case { action } => commands::case::handle(&action, client, flags).await,
        Commands::Step { action } => commands::step::handle(&action, client, flags).await,
        Commands::Results { action } => commands::result::handle(&action, client, flags).await,
        Commands::User { action } => commands::user::handle(&action, client, flags).await,
    }
}
