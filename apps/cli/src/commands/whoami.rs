use cliplet_client::ApiClient;

use crate::commands::CommandError;
use crate::config::Config;

pub async fn run(config: &Config) -> Result<(), CommandError> {
    let api = ApiClient::new(config.http());

    match api.identity().await? {
        Some(id) => {
            println!("{} <{}>", id.username, id.email);
            println!("{} plan, {} credits", id.plan, id.credits);
            if let Some(reset) = &id.next_reset_at {
                println!("credits reset at {reset}");
            }
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
