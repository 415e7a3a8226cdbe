//! Configuration module
//!
//! Everything is sourced from the environment (with `.env` support for local
//! development). Required credentials fail fast with a
//! [`PublishError::Config`]; tunables fall back to the constants below.

use std::env;
use std::path::PathBuf;

use crate::error::{PublishError, PublishResult};

const DEFAULT_UPLOADS_ROOT: &str = "uploads";
const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
const DEFAULT_SOCIAL_API_BASE: &str = "https://graph.instagram.com/v23.0";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 60;
const DEFAULT_UPLOAD_CHUNK_BYTES: usize = 1024 * 1024;

/// OAuth app credentials for the video host (long-lived refresh token flow).
#[derive(Clone, Debug)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Application configuration for a publish run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root of the date-keyed upload folders (`uploads/YYYY/MM/DD`).
    pub uploads_root: PathBuf,
    /// Public GCS bucket the video is staged into.
    pub bucket: String,
    pub instagram_account_id: String,
    pub instagram_access_token: String,
    pub social_api_base: String,
    /// The video-host upload step is skippable at runtime; staging and the
    /// social publish always run.
    pub youtube_upload_enabled: bool,
    /// Present iff `youtube_upload_enabled` is set.
    pub google: Option<GoogleCredentials>,
    pub ffmpeg_path: String,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
    pub upload_chunk_bytes: usize,
}

impl Config {
    pub fn from_env() -> PublishResult<Self> {
        dotenvy::dotenv().ok();

        let bucket = env::var("GCP_PUBLIC_BUCKET_NAME")
            .or_else(|_| env::var("GCP_BUCKET_NAME"))
            .map_err(|_| {
                PublishError::Config(
                    "No bucket configured. Set GCP_PUBLIC_BUCKET_NAME or GCP_BUCKET_NAME".into(),
                )
            })?;

        let youtube_upload_enabled = env::var("YOUTUBE_UPLOAD_ENABLED")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        let google = if youtube_upload_enabled {
            Some(GoogleCredentials {
                client_id: require_env("GOOGLE_CLIENT_ID")?,
                client_secret: require_env("GOOGLE_CLIENT_SECRET")?,
                refresh_token: require_env("GOOGLE_REFRESH_TOKEN")?,
            })
        } else {
            None
        };

        Ok(Config {
            uploads_root: env::var("UPLOADS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOADS_ROOT)),
            bucket,
            instagram_account_id: require_env("INSTAGRAM_ACCOUNT_ID")?,
            instagram_access_token: require_env("INSTAGRAM_ACCESS_TOKEN")?,
            social_api_base: env::var("SOCIAL_API_BASE")
                .unwrap_or_else(|_| DEFAULT_SOCIAL_API_BASE.to_string()),
            youtube_upload_enabled,
            google,
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| DEFAULT_FFMPEG_PATH.to_string()),
            poll_interval_secs: env::var("SOCIAL_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            poll_timeout_secs: env::var("SOCIAL_POLL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
            upload_chunk_bytes: env::var("UPLOAD_CHUNK_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_UPLOAD_CHUNK_BYTES),
        })
    }
}

fn require_env(name: &str) -> PublishResult<String> {
    env::var(name).map_err(|_| {
        PublishError::Config(format!("Missing required environment variable: {}", name))
    })
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_truthy_forms() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }
}
