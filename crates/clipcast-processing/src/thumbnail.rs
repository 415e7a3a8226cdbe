//! 9:16 thumbnail extraction via the system ffmpeg binary.
//!
//! The frame is scaled up to cover 1080x1920 and center-cropped, so any input
//! aspect ratio yields a full-bleed vertical thumbnail. Generation is best
//! effort: every failure is logged and reported as `false`, never as an error.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, warn};

pub const THUMBNAIL_FILENAME: &str = "thumbnail_9x16.jpg";

const VERTICAL_FILTER: &str =
    "scale=1080:1920:force_original_aspect_ratio=increase,crop=1080:1920";

#[derive(Debug, Clone)]
pub struct ThumbnailGenerator {
    ffmpeg_path: String,
}

impl ThumbnailGenerator {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        ThumbnailGenerator {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Output path: `thumbnail_9x16.jpg` next to the video.
    pub fn output_path(video: &Path) -> PathBuf {
        video.with_file_name(THUMBNAIL_FILENAME)
    }

    fn build_args(video: &Path, output: &Path, offset_seconds: f64) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-ss".to_string(),
            format!("{}", offset_seconds),
            "-i".to_string(),
            video.display().to_string(),
            "-vframes".to_string(),
            "1".to_string(),
            "-vf".to_string(),
            VERTICAL_FILTER.to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            output.display().to_string(),
        ]
    }

    /// Extract a single frame at `offset_seconds`. Returns whether the
    /// thumbnail file was produced.
    pub async fn generate(&self, video: &Path, offset_seconds: f64) -> Option<PathBuf> {
        let output = Self::output_path(video);
        let args = Self::build_args(video, &output, offset_seconds);
        debug!(ffmpeg = %self.ffmpeg_path, video = %video.display(), "extracting thumbnail");

        let result = Command::new(&self.ffmpeg_path)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await;

        match result {
            Ok(out) if out.status.success() && output.is_file() => Some(output),
            Ok(out) => {
                warn!(
                    video = %video.display(),
                    status = %out.status,
                    stderr = %String::from_utf8_lossy(&out.stderr),
                    "thumbnail generation failed, continuing without thumbnail"
                );
                None
            }
            Err(e) => {
                warn!(
                    ffmpeg = %self.ffmpeg_path,
                    error = %e,
                    "could not run ffmpeg, continuing without thumbnail"
                );
                None
            }
        }
    }
}
