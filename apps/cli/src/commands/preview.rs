use std::sync::Arc;

use cliplet_client::{ApiClient, Error as ApiError, LoginGate};

use crate::commands::{CommandError, gate_via_prompt};
use crate::config::Config;
use crate::tui;

#[derive(clap::Args)]
pub struct Args {
    /// Job id.
    pub job: String,

    /// Clip index to start at.
    #[arg(long, default_value_t = 0)]
    pub clip: u32,
}

pub async fn run(config: &Config, args: Args) -> Result<(), CommandError> {
    let http = config.http();
    let api = Arc::new(ApiClient::new(http.clone()));
    let gate = Arc::new(LoginGate::new());

    if !gate_via_prompt(config, &http, &api, &gate).await? {
        return Err(ApiError::AuthRequired("login was not completed".into()).into());
    }

    let identity = api.identity().await?;
    let clips = api.clips(&args.job).await?;
    if clips.is_empty() {
        println!("Job {} has no clips to preview.", args.job);
        return Ok(());
    }

    let start_clip = if clips.iter().any(|c| c.index == args.clip) {
        args.clip
    } else {
        tracing::warn!(
            "job {} has no clip {}, starting at the first one",
            args.job,
            args.clip
        );
        clips[0].index
    };

    tui::run(tui::Launch {
        config: config.clone(),
        http,
        api,
        gate,
        identity,
        job_id: args.job,
        clips,
        start_clip,
    })
    .await
}
