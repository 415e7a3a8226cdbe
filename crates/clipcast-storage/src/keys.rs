//! Object key and public URL layout for staged videos.

/// Key for a staged video: `video_assets/YYYY/MM/DD/<filename>`.
///
/// The date is the already-validated ISO `YYYY-MM-DD` string, re-sliced into
/// path segments so the bucket mirrors the local upload layout.
pub fn staging_key(date: &str, filename: &str) -> String {
    format!("video_assets/{}/{}", date.replace('-', "/"), filename)
}

/// Anonymous HTTPS URL for an object in a public bucket.
pub fn public_url(bucket: &str, key: &str) -> String {
    format!("https://storage.googleapis.com/{}/{}", bucket, key)
}
