//! Local asset handling: resolving the date-keyed upload folder, picking the
//! video file, reading the metadata sidecar, and generating the 9:16 thumbnail
//! via ffmpeg.

pub mod assets;
pub mod thumbnail;

pub use assets::{find_video_file, load_metadata, resolve_date_folder};
pub use thumbnail::{ThumbnailGenerator, THUMBNAIL_FILENAME};
