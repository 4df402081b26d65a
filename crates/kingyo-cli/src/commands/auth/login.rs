use std::io::{BufRead, IsTerminal, Write};

use anyhow::Context;
use kingyo_client::Kingyo;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse<'a> {
    authenticated: bool,
    username: &'a str,
    token_source: &'static str,
}

pub async fn handle(args: &AuthLoginArgs, client: &Kingyo, flags: &GlobalFlags) -> anyhow::Result<()> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => read_password()?,
    };

    client
        .session()
        .sign_in(&args.username, &password)
        .await
        .context("auth login")?;

    output(
        &AuthLoginResponse {
            authenticated: true,
            username: &args.username,
            token_source: client.session().status().source,
        },
        flags.format,
    )
}

fn read_password() -> anyhow::Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("password: ");
        std::io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("auth login: no password given (use --password or pipe it on stdin)");
    }
    Ok(password)
}
