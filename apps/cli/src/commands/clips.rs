use cliplet_client::ApiClient;

use crate::commands::CommandError;
use crate::config::Config;

#[derive(clap::Args)]
pub struct Args {
    /// Job id.
    pub job: String,
}

pub async fn run(config: &Config, args: Args) -> Result<(), CommandError> {
    let api = ApiClient::new(config.http());
    let clips = api.clips(&args.job).await?;

    if clips.is_empty() {
        println!("No clips yet for job {}.", args.job);
        return Ok(());
    }

    println!("{:>4}  {:>16}  {:>8}  FILE", "CLIP", "RANGE", "LENGTH");
    for clip in clips {
        println!(
            "{:>4}  {:>7.1}-{:>7.1}s  {:>7.1}s  {}",
            clip.index,
            clip.start,
            clip.end,
            clip.duration(),
            clip.filename
        );
    }
    Ok(())
}
