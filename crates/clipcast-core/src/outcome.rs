//! The unified result record emitted by a publish run.

use serde::Serialize;

/// Top-level publish result, rendered to stdout as JSON by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub date: String,
    pub video_file: String,
    pub youtube: YoutubeOutcome,
    pub gcs_public_url: String,
    pub instagram: SocialOutcome,
}

/// Either the uploaded video's identifiers or an explicit skip marker, so the
/// consumer can always distinguish "not attempted" from "attempted".
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum YoutubeOutcome {
    Skipped {
        skipped: bool,
    },
    Uploaded {
        #[serde(rename = "videoId")]
        video_id: String,
        #[serde(rename = "watchUrl")]
        watch_url: String,
    },
}

impl YoutubeOutcome {
    pub fn skipped() -> Self {
        YoutubeOutcome::Skipped { skipped: true }
    }
}

/// Social publications by surface. `None` means the surface was disabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SocialOutcome {
    pub reel: Option<SocialPublication>,
    pub post: Option<SocialPublication>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialPublication {
    pub creation_id: String,
    pub publish_id: String,
}
