use cliplet_client::ApiClient;

use crate::commands::CommandError;
use crate::config::Config;

pub async fn run(config: &Config) -> Result<(), CommandError> {
    let api = ApiClient::new(config.http());

    // The local cookie goes away regardless; an unreachable service just
    // means the server-side session ages out on its own.
    if let Err(e) = api.logout().await {
        tracing::warn!("logout request failed: {e}");
    }
    config.clear_cookie()?;

    println!("Logged out.");
    Ok(())
}
