//! Platform publishing: the resumable video-host upload, the social
//! container/poll/publish flow, and the orchestrator that runs the whole
//! pipeline for one date.

pub mod clock;
pub mod orchestrator;
pub mod social;
pub mod youtube;

pub use clock::{Clock, SystemClock};
pub use orchestrator::Orchestrator;
pub use social::{InstagramApi, SocialApi, SocialPublisher};
pub use youtube::{UploadedVideo, VideoHost, YoutubeUploader};
