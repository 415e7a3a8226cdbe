//! Social publish flow: create a media container from the staged URL, poll it
//! until the platform finishes processing, then publish it.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use clipcast_core::caption::compose_caption;
use clipcast_core::metadata::{SocialBody, YoutubeBody};
use clipcast_core::outcome::{SocialOutcome, SocialPublication};
use clipcast_core::{PublishError, PublishResult};

const REELS_MEDIA_TYPE: &str = "REELS";

/// Container creation payload sent to the platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerRequest {
    pub video_url: String,
    pub media_type: &'static str,
    pub caption: String,
    pub share_to_feed: bool,
}

/// Platform-reported processing status of a container.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerStatus {
    Finished,
    InProgress,
    Error(String),
}

/// Seam over the platform's container API.
#[async_trait]
pub trait SocialApi: Send + Sync {
    async fn create_container(&self, request: &ContainerRequest) -> PublishResult<String>;
    async fn container_status(&self, container_id: &str) -> PublishResult<ContainerStatus>;
    async fn publish_container(&self, container_id: &str) -> PublishResult<String>;
}

pub struct InstagramApi {
    api_base: String,
    account_id: String,
    access_token: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    status_code: String,
}

impl InstagramApi {
    pub fn new(
        api_base: impl Into<String>,
        account_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        InstagramApi {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            account_id: account_id.into(),
            access_token: access_token.into(),
            http: reqwest::Client::new(),
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> PublishResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Platform(format!(
                "{} returned {}: {}",
                context, status, body
            )));
        }
        response
            .json()
            .await
            .map_err(|e| PublishError::Platform(format!("{}: malformed response: {}", context, e)))
    }
}

#[async_trait]
impl SocialApi for InstagramApi {
    async fn create_container(&self, request: &ContainerRequest) -> PublishResult<String> {
        let url = format!("{}/{}/media", self.api_base, self.account_id);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| PublishError::Platform(format!("Container create failed: {}", e)))?;
        let body: IdResponse = Self::read_json(response, "Container create").await?;
        Ok(body.id)
    }

    async fn container_status(&self, container_id: &str) -> PublishResult<ContainerStatus> {
        let url = format!("{}/{}", self.api_base, container_id);
        let response = self
            .http
            .get(&url)
            .query(&[("fields", "status_code")])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| PublishError::Platform(format!("Container status failed: {}", e)))?;
        let body: StatusResponse = Self::read_json(response, "Container status").await?;

        Ok(match body.status_code.as_str() {
            "FINISHED" => ContainerStatus::Finished,
            "ERROR" | "EXPIRED" => ContainerStatus::Error(body.status_code),
            _ => ContainerStatus::InProgress,
        })
    }

    async fn publish_container(&self, container_id: &str) -> PublishResult<String> {
        let url = format!("{}/{}/media_publish", self.api_base, self.account_id);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "creation_id": container_id }))
            .send()
            .await
            .map_err(|e| PublishError::Platform(format!("Container publish failed: {}", e)))?;
        let body: IdResponse = Self::read_json(response, "Container publish").await?;
        Ok(body.id)
    }
}

/// Container lifecycle. A container is only published from `Ready`; an error
/// or deadline in `Processing` aborts without publishing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ContainerState {
    Created,
    Processing,
    Ready,
}

pub struct SocialPublisher<A, C> {
    api: A,
    clock: C,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl<A, C> SocialPublisher<A, C>
where
    A: SocialApi,
    C: crate::clock::Clock,
{
    pub fn new(api: A, clock: C, poll_interval: Duration, poll_timeout: Duration) -> Self {
        SocialPublisher {
            api,
            clock,
            poll_interval,
            poll_timeout,
        }
    }

    /// Publish the staged video. One container backs both surfaces: when the
    /// post surface is enabled, `share_to_feed` is forced on so the reel also
    /// lands in the feed.
    pub async fn publish(
        &self,
        video_url: &str,
        social: &SocialBody,
        youtube: &YoutubeBody,
    ) -> PublishResult<SocialOutcome> {
        if !social.enable_reel && !social.enable_post {
            info!("both social surfaces disabled, skipping social publish");
            return Ok(SocialOutcome::default());
        }

        let request = ContainerRequest {
            video_url: video_url.to_string(),
            media_type: REELS_MEDIA_TYPE,
            caption: compose_caption(social, youtube),
            share_to_feed: social.share_to_feed || social.enable_post,
        };

        let creation_id = self.api.create_container(&request).await?;
        info!(creation_id = %creation_id, "media container created");

        let deadline = self.clock.now() + self.poll_timeout;
        let mut state = ContainerState::Created;
        let publish_id = loop {
            state = match state {
                ContainerState::Created => ContainerState::Processing,
                ContainerState::Processing => {
                    match self.api.container_status(&creation_id).await? {
                        ContainerStatus::Finished => ContainerState::Ready,
                        ContainerStatus::Error(code) => {
                            return Err(PublishError::Platform(format!(
                                "Container {} failed processing: {}",
                                creation_id, code
                            )));
                        }
                        ContainerStatus::InProgress => {
                            if self.clock.now() >= deadline {
                                return Err(PublishError::Timeout(format!(
                                    "Container {} still processing after {:?}",
                                    creation_id, self.poll_timeout
                                )));
                            }
                            debug!(creation_id = %creation_id, "container still processing");
                            self.clock.sleep(self.poll_interval).await;
                            ContainerState::Processing
                        }
                    }
                }
                ContainerState::Ready => {
                    break self.api.publish_container(&creation_id).await?;
                }
            };
        };
        info!(publish_id = %publish_id, "media container published");

        let publication = SocialPublication {
            creation_id,
            publish_id,
        };
        Ok(SocialOutcome {
            reel: social.enable_reel.then(|| publication.clone()),
            post: social.enable_post.then(|| publication.clone()),
        })
    }
}
