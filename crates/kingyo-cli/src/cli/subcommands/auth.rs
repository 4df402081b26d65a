use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Exchange a username and password for a token pair.
    Login(AuthLoginArgs),
    /// Clear stored tokens and cached data.
    Logout,
    /// Exchange the stored refresh token for a new access token.
    Refresh,
    /// Show current session status.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long, short = 'u')]
    pub username: String,
    /// Read from stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
}
