use std::path::PathBuf;

use cliplet_captions::ClipKey;
use cliplet_client::ApiClient;

use crate::commands::CommandError;
use crate::config::Config;

#[derive(clap::Args)]
pub struct Args {
    /// Job id.
    pub job: String,

    /// Clip index.
    pub clip: u32,

    /// Write to a file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub async fn run(config: &Config, args: Args) -> Result<(), CommandError> {
    let api = ApiClient::new(config.http());
    let key = ClipKey {
        job_id: args.job,
        clip_index: args.clip,
    };
    let srt = api.captions_srt(&key).await?;

    match args.out {
        Some(path) => {
            tokio::fs::write(&path, &srt).await?;
            println!("Wrote {}.", path.display());
        }
        None => print!("{srt}"),
    }
    Ok(())
}
