use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Show the signed-in user.
    Me,
    /// List all users.
    List,
}
