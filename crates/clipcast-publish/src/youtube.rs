//! Resumable video-host upload.
//!
//! Flow: exchange the long-lived refresh token for an access token, open a
//! resumable session (the session URL comes back in the `Location` header),
//! then PUT the file in fixed-size chunks with `Content-Range` headers. The
//! server answers 308 after each intermediate chunk and 2xx with the video
//! resource after the last one.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use clipcast_core::config::GoogleCredentials;
use clipcast_core::metadata::YoutubeBody;
use clipcast_core::{PublishError, PublishResult};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";
const THUMBNAIL_URL: &str = "https://www.googleapis.com/upload/youtube/v3/thumbnails/set";

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedVideo {
    pub video_id: String,
    pub watch_url: String,
}

/// Seam over the video host so the orchestrator can be driven by fakes.
#[async_trait]
pub trait VideoHost: Send + Sync {
    async fn upload(&self, video: &Path, body: &YoutubeBody) -> PublishResult<UploadedVideo>;
    async fn attach_thumbnail(&self, video_id: &str, thumbnail: &Path) -> PublishResult<()>;
}

pub struct YoutubeUploader {
    credentials: GoogleCredentials,
    http: reqwest::Client,
    chunk_bytes: usize,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct VideoResource {
    id: String,
}

impl YoutubeUploader {
    pub fn new(credentials: GoogleCredentials, chunk_bytes: usize) -> Self {
        YoutubeUploader {
            credentials,
            http: reqwest::Client::new(),
            chunk_bytes: chunk_bytes.max(1),
        }
    }

    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }

    async fn refresh_access_token(&self) -> PublishResult<String> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", self.credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| PublishError::HostApi(format!("Token refresh failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::HostApi(format!(
                "Token refresh returned {}: {}",
                status, body
            )));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PublishError::HostApi(format!("Malformed token response: {}", e)))?;
        Ok(token.access_token)
    }

    async fn initiate_session(
        &self,
        token: &str,
        body: &YoutubeBody,
        total_bytes: u64,
    ) -> PublishResult<String> {
        let response = self
            .http
            .post(UPLOAD_URL)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(token)
            .header("X-Upload-Content-Type", "video/mp4")
            .header("X-Upload-Content-Length", total_bytes)
            .json(body)
            .send()
            .await
            .map_err(|e| PublishError::HostApi(format!("Upload session request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PublishError::HostApi(format!(
                "Upload session returned {}: {}",
                status, text
            )));
        }
        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                PublishError::HostApi("Upload session response missing Location header".into())
            })
    }

    async fn upload_chunks(
        &self,
        token: &str,
        session_url: &str,
        data: Vec<u8>,
    ) -> PublishResult<UploadedVideo> {
        let total = data.len();
        let mut offset = 0usize;

        loop {
            let end = (offset + self.chunk_bytes).min(total);
            let chunk = data[offset..end].to_vec();
            let content_range = format!("bytes {}-{}/{}", offset, end - 1, total);

            let response = self
                .http
                .put(session_url)
                .bearer_auth(token)
                .header(reqwest::header::CONTENT_RANGE, &content_range)
                .header(reqwest::header::CONTENT_LENGTH, chunk.len() as u64)
                .body(chunk)
                .send()
                .await
                .map_err(|e| PublishError::HostApi(format!("Chunk upload failed: {}", e)))?;

            let status = response.status();
            if status.as_u16() == 308 {
                offset = end;
                debug!(uploaded = offset, total, "chunk accepted, resuming");
                continue;
            }
            if status.is_success() {
                let resource: VideoResource = response.json().await.map_err(|e| {
                    PublishError::HostApi(format!("Malformed upload response: {}", e))
                })?;
                return Ok(UploadedVideo {
                    watch_url: Self::watch_url(&resource.id),
                    video_id: resource.id,
                });
            }
            let text = response.text().await.unwrap_or_default();
            return Err(PublishError::HostApi(format!(
                "Chunk upload ({}) returned {}: {}",
                content_range, status, text
            )));
        }
    }
}

#[async_trait]
impl VideoHost for YoutubeUploader {
    async fn upload(&self, video: &Path, body: &YoutubeBody) -> PublishResult<UploadedVideo> {
        let data = tokio::fs::read(video).await?;
        if data.is_empty() {
            return Err(PublishError::HostApi(format!(
                "Refusing to upload empty video file: {}",
                video.display()
            )));
        }

        let token = self.refresh_access_token().await?;
        let session_url = self
            .initiate_session(&token, body, data.len() as u64)
            .await?;
        info!(video = %video.display(), bytes = data.len(), "starting resumable upload");

        let uploaded = self.upload_chunks(&token, &session_url, data).await?;
        info!(video_id = %uploaded.video_id, "video upload complete");
        Ok(uploaded)
    }

    async fn attach_thumbnail(&self, video_id: &str, thumbnail: &Path) -> PublishResult<()> {
        let data = tokio::fs::read(thumbnail).await?;
        let token = self.refresh_access_token().await?;

        let response = self
            .http
            .post(THUMBNAIL_URL)
            .query(&[("videoId", video_id)])
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(data)
            .send()
            .await
            .map_err(|e| PublishError::HostApi(format!("Thumbnail upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PublishError::HostApi(format!(
                "Thumbnail upload returned {}: {}",
                status, text
            )));
        }
        Ok(())
    }
}
