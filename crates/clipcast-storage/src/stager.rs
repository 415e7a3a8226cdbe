//! GCS staging backend.

use std::path::Path as FsPath;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use tracing::{error, info};

use clipcast_core::{PublishError, PublishResult};

use crate::keys::{public_url, staging_key};

const HEAD_TIMEOUT: Duration = Duration::from_secs(10);
const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Uploads a local video into public hosting and returns its anonymous URL.
#[async_trait]
pub trait Stager: Send + Sync {
    async fn stage(&self, date: &str, video: &FsPath) -> PublishResult<String>;
}

pub struct GcsStager {
    store: GoogleCloudStorage,
    bucket: String,
    http: reqwest::Client,
}

impl GcsStager {
    /// Credentials come from the usual GCP environment
    /// (GOOGLE_APPLICATION_CREDENTIALS, metadata server, etc.).
    pub fn new(bucket: impl Into<String>) -> PublishResult<Self> {
        let bucket = bucket.into();
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| PublishError::Config(format!("GCS client: {}", e)))?;

        Ok(GcsStager {
            store,
            bucket,
            http: reqwest::Client::new(),
        })
    }

    /// Confirm the object is reachable without credentials. The social
    /// platform fetches the video anonymously, so a private-but-present
    /// object is as useless as a missing one.
    async fn verify_public(&self, url: &str) -> PublishResult<()> {
        let response = self
            .http
            .head(url)
            .timeout(HEAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                PublishError::Publicity(format!("HEAD {} failed: {}", url, e))
            })?;

        if !response.status().is_success() {
            return Err(PublishError::Publicity(format!(
                "Staged object is not publicly reachable: HEAD {} returned {}",
                url,
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Stager for GcsStager {
    async fn stage(&self, date: &str, video: &FsPath) -> PublishResult<String> {
        let filename = video
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PublishError::Storage(format!("Invalid video filename: {}", video.display()))
            })?;
        let key = staging_key(date, filename);
        let location = Path::from(key.clone());

        let data = tokio::fs::read(video).await?;
        let size = data.len();
        let bytes = Bytes::from(data);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, VIDEO_CONTENT_TYPE.into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, PutPayload::from(bytes), opts)
            .await
            .map_err(|e| {
                error!(bucket = %self.bucket, key = %key, error = %e, "GCS upload failed");
                PublishError::Storage(format!("Upload to gs://{}/{} failed: {}", self.bucket, key, e))
            })?;

        let url = public_url(&self.bucket, &key);
        self.verify_public(&url).await?;
        info!(bucket = %self.bucket, key = %key, size_bytes = size, "staged video publicly");
        Ok(url)
    }
}
