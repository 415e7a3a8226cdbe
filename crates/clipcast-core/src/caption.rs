//! Caption composition for the social publish.
//!
//! An explicit caption in the sidecar wins outright; otherwise the caption is
//! derived from the video-host title and description. Hashtags are normalized
//! and appended as a trailing block. The video-host tags are a fallback
//! source for that block only on the derived path: an explicit caption
//! carries exactly the hashtags the sidecar gave it, or none.

use crate::metadata::{SocialBody, YoutubeBody};

/// Strip leading `#`s, drop interior whitespace, and discard empties. The
/// returned tags carry no `#`; [`compose_caption`] re-adds it.
pub fn normalize_hashtags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| {
            tag.trim()
                .trim_start_matches('#')
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
        })
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Build the final caption from the merged bodies.
pub fn compose_caption(social: &SocialBody, youtube: &YoutubeBody) -> String {
    let explicit = social
        .caption
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let explicit_tags = social
        .hashtags
        .as_deref()
        .map(normalize_hashtags)
        .unwrap_or_default();

    let (base, tags) = match explicit {
        Some(caption) => (caption.to_string(), explicit_tags),
        None => {
            let title = youtube.snippet.title.trim();
            let description = youtube.snippet.description.trim();
            let base = if description.is_empty() {
                title.to_string()
            } else {
                format!("{}\n\n{}", title, description)
            };
            let tags = if explicit_tags.is_empty() {
                normalize_hashtags(&youtube.snippet.tags)
            } else {
                explicit_tags
            };
            (base, tags)
        }
    };

    let caption = if tags.is_empty() {
        base
    } else {
        let block = tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{}\n\n{}", base, block)
    };
    caption.trim().to_string()
}
