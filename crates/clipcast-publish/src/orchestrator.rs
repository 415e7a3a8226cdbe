//! End-to-end pipeline for publishing one day's video.
//!
//! Order matters: local resolution and metadata first (cheap, fail fast),
//! then the optional video-host upload, then public staging, then the social
//! publish that consumes the staged URL.

use std::path::Path;

use tracing::{info, warn};

use clipcast_core::metadata::PublishDefaults;
use clipcast_core::outcome::{PublishOutcome, YoutubeOutcome};
use clipcast_core::{Config, PublishResult};
use clipcast_processing::{find_video_file, load_metadata, resolve_date_folder, ThumbnailGenerator};
use clipcast_storage::Stager;

use crate::clock::Clock;
use crate::social::{SocialApi, SocialPublisher};
use crate::youtube::VideoHost;

pub struct Orchestrator<H, S, A, C> {
    config: Config,
    defaults: PublishDefaults,
    thumbnails: ThumbnailGenerator,
    host: Option<H>,
    stager: S,
    social: SocialPublisher<A, C>,
}

impl<H, S, A, C> Orchestrator<H, S, A, C>
where
    H: VideoHost,
    S: Stager,
    A: SocialApi,
    C: Clock,
{
    pub fn new(
        config: Config,
        defaults: PublishDefaults,
        host: Option<H>,
        stager: S,
        social: SocialPublisher<A, C>,
    ) -> Self {
        let thumbnails = ThumbnailGenerator::new(config.ffmpeg_path.clone());
        Orchestrator {
            config,
            defaults,
            thumbnails,
            host,
            stager,
            social,
        }
    }

    pub async fn run(
        &self,
        date: &str,
        file_override: Option<&Path>,
    ) -> PublishResult<PublishOutcome> {
        let folder = resolve_date_folder(&self.config.uploads_root, date)?;
        let video = find_video_file(&folder, file_override)?;
        let doc = load_metadata(&folder)?;
        let youtube_body = self.defaults.youtube_body(&doc);
        let social_body = self.defaults.social_body(&doc);
        info!(date, video = %video.display(), "starting publish run");

        let thumbnail = self
            .thumbnails
            .generate(&video, social_body.thumb_offset_seconds)
            .await;

        let youtube = match (&self.host, self.config.youtube_upload_enabled) {
            (Some(host), true) => {
                let uploaded = host.upload(&video, &youtube_body).await?;
                if let Some(thumb) = &thumbnail {
                    if let Err(e) = host.attach_thumbnail(&uploaded.video_id, thumb).await {
                        warn!(video_id = %uploaded.video_id, error = %e,
                            "thumbnail attach failed, video is published without it");
                    }
                }
                YoutubeOutcome::Uploaded {
                    video_id: uploaded.video_id,
                    watch_url: uploaded.watch_url,
                }
            }
            _ => {
                info!("video-host upload disabled, skipping");
                YoutubeOutcome::skipped()
            }
        };

        let gcs_public_url = self.stager.stage(date, &video).await?;
        let instagram = self
            .social
            .publish(&gcs_public_url, &social_body, &youtube_body)
            .await?;

        Ok(PublishOutcome {
            date: date.to_string(),
            video_file: video.display().to_string(),
            youtube,
            gcs_public_url,
            instagram,
        })
    }
}
