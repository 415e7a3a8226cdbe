//! Public staging of the video in Google Cloud Storage.
//!
//! The staged object must be anonymously reachable because the social
//! platform fetches the video by URL; the bucket is expected to grant public
//! read and every upload is verified with an unauthenticated HEAD request.

pub mod keys;
pub mod stager;

pub use keys::{public_url, staging_key};
pub use stager::{GcsStager, Stager};
