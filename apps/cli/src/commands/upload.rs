use std::path::PathBuf;
use std::sync::Arc;

use cliplet_client::{ApiClient, Aspect, Error as ApiError, JobParams, LoginGate};

use crate::commands::{CommandError, gate_via_prompt};
use crate::config::Config;

#[derive(clap::Args)]
pub struct Args {
    /// Video file to upload.
    pub video: PathBuf,

    /// Clip length in seconds (5 to 120).
    #[arg(long, default_value_t = 25)]
    pub clip_len: u32,

    /// Most clips to cut (1 to 50).
    #[arg(long, default_value_t = 8)]
    pub max_clips: u32,

    /// Output aspect: 9:16, 1:1 or 16:9.
    #[arg(long, default_value = "9:16")]
    pub aspect: Aspect,
}

pub async fn run(config: &Config, args: Args) -> Result<(), CommandError> {
    let http = config.http();
    let api = Arc::new(ApiClient::new(http.clone()));
    let gate = Arc::new(LoginGate::new());

    if !gate_via_prompt(config, &http, &api, &gate).await? {
        return Err(ApiError::AuthRequired("login was not completed".into()).into());
    }

    let file_name = args
        .video
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video.mp4".to_string());
    let video = tokio::fs::read(&args.video).await?;

    let params = JobParams {
        clip_len: args.clip_len.clamp(5, 120),
        max_clips: args.max_clips.clamp(1, 50),
        aspect: args.aspect,
    };

    println!(
        "Uploading {} ({:.1} MiB)...",
        file_name,
        video.len() as f64 / (1024.0 * 1024.0)
    );
    let created = api.create_job(&file_name, video, &params).await?;

    println!("Job {} queued, {} credits left.", created.job_id, created.credits);
    println!("Next: cliplet preview {}", created.job_id);
    Ok(())
}
