use cliplet_client::ApiClient;

use crate::commands::CommandError;
use crate::config::Config;

pub async fn run(config: &Config) -> Result<(), CommandError> {
    let api = ApiClient::new(config.http());
    let plans = api.plans().await?;

    println!("{:<8} {:<10} {:>8} {:>10}", "KEY", "NAME", "CREDITS", "PER MONTH");
    for plan in plans {
        println!(
            "{:<8} {:<10} {:>8} {:>10}",
            plan.key,
            plan.name,
            plan.credits,
            format!("${}", plan.price_monthly)
        );
    }
    Ok(())
}
