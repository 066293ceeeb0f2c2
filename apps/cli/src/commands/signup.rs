use cliplet_client::ApiClient;

use crate::commands::{CommandError, password_or_prompt};
use crate::config::Config;

#[derive(clap::Args)]
pub struct Args {
    /// Email address for the account.
    pub email: String,

    /// Username to sign up as.
    pub username: String,

    /// Password. Falls back to $CLIPLET_PASSWORD, then an interactive prompt.
    #[arg(long, env = "CLIPLET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run(config: &Config, args: Args) -> Result<(), CommandError> {
    let password = password_or_prompt(args.password).await?;

    let http = config.http();
    let api = ApiClient::new(http.clone());
    let identity = api.signup(&args.email, &args.username, &password).await?;

    if let Some(cookie) = http.session_cookie() {
        config.save_cookie(&cookie)?;
    }

    println!(
        "Welcome, {}. You are on the {} plan with {} credits.",
        identity.username, identity.plan, identity.credits
    );
    Ok(())
}
