use cliplet_client::ApiClient;

use crate::commands::{CommandError, password_or_prompt};
use crate::config::Config;

#[derive(clap::Args)]
pub struct Args {
    /// Username to log in as.
    pub username: String,

    /// Password. Falls back to $CLIPLET_PASSWORD, then an interactive prompt.
    #[arg(long, env = "CLIPLET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run(config: &Config, args: Args) -> Result<(), CommandError> {
    let password = password_or_prompt(args.password).await?;

    let http = config.http();
    let api = ApiClient::new(http.clone());
    let identity = api.login(&args.username, &password).await?;

    if let Some(cookie) = http.session_cookie() {
        config.save_cookie(&cookie)?;
    }

    println!(
        "Logged in as {} ({} plan, {} credits).",
        identity.username, identity.plan, identity.credits
    );
    Ok(())
}
