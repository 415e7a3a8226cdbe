//! clipcast — publish one day's short vertical video everywhere at once.
//!
//! Reads `uploads/YYYY/MM/DD`, optionally uploads to the video host, stages
//! the file publicly in GCS, and publishes it as a reel/post. Prints the
//! unified result (or a structured error) as JSON and exits 0/1.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use clipcast_cli::{error_json, init_tracing};
use clipcast_core::metadata::PublishDefaults;
use clipcast_core::outcome::PublishOutcome;
use clipcast_core::{Config, PublishResult};
use clipcast_publish::{
    InstagramApi, Orchestrator, SocialPublisher, SystemClock, YoutubeUploader,
};
use clipcast_storage::GcsStager;

#[derive(Parser)]
#[command(name = "clipcast", about = "Cross-platform short-video publisher")]
struct Cli {
    /// Publish date, ISO format (YYYY-MM-DD)
    #[arg(long)]
    date: String,
    /// Video file override (absolute, or relative to the date folder)
    #[arg(long)]
    file: Option<PathBuf>,
}

async fn run(cli: Cli) -> PublishResult<PublishOutcome> {
    let config = Config::from_env()?;

    let host = config
        .google
        .clone()
        .map(|credentials| YoutubeUploader::new(credentials, config.upload_chunk_bytes));
    let stager = GcsStager::new(config.bucket.clone())?;
    let api = InstagramApi::new(
        config.social_api_base.clone(),
        config.instagram_account_id.clone(),
        config.instagram_access_token.clone(),
    );
    let social = SocialPublisher::new(
        api,
        SystemClock,
        Duration::from_secs(config.poll_interval_secs),
        Duration::from_secs(config.poll_timeout_secs),
    );

    let orchestrator = Orchestrator::new(config, PublishDefaults::default(), host, stager, social);
    orchestrator.run(&cli.date, cli.file.as_deref()).await
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(outcome) => {
            let rendered = serde_json::to_string_pretty(&outcome)
                .unwrap_or_else(|e| error_json(&e.into()));
            println!("{}", rendered);
        }
        Err(e) => {
            println!("{}", error_json(&e));
            std::process::exit(1);
        }
    }
}
