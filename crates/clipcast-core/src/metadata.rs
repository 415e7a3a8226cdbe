//! Typed metadata model: the optional `metadata.json` sidecar, the built-in
//! per-platform defaults, and the override merge.
//!
//! The merge contract: defaults are deep-copied, then each recognized field
//! that is present in the sidecar overwrites the corresponding default.
//! Unknown keys are ignored without error (serde drops them on
//! deserialization), and absent keys never clear a default. The merge is pure
//! and idempotent.

use serde::{Deserialize, Serialize};

/// Sidecar document (`metadata.json`). Both sections are optional; an absent
/// sidecar deserializes to `MetadataDoc::default()` and yields pure defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataDoc {
    pub youtube: Option<YoutubeOverrides>,
    pub instagram: Option<SocialOverrides>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YoutubeOverrides {
    pub snippet: Option<SnippetOverrides>,
    pub status: Option<StatusOverrides>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnippetOverrides {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
    #[serde(rename = "defaultLanguage")]
    pub default_language: Option<String>,
    #[serde(rename = "defaultAudioLanguage")]
    pub default_audio_language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusOverrides {
    #[serde(rename = "privacyStatus")]
    pub privacy_status: Option<String>,
    #[serde(rename = "selfDeclaredMadeForKids")]
    pub self_declared_made_for_kids: Option<bool>,
    pub license: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialOverrides {
    pub caption: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub share_to_feed: Option<bool>,
    pub enable_reel: Option<bool>,
    pub enable_post: Option<bool>,
    pub thumb_offset_seconds: Option<f64>,
}

/// Request body for the video-host upload, serialized in the API's casing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoutubeBody {
    pub snippet: Snippet,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snippet {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(rename = "categoryId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(rename = "defaultLanguage", skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(rename = "defaultAudioLanguage", skip_serializing_if = "Option::is_none")]
    pub default_audio_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    #[serde(rename = "privacyStatus")]
    pub privacy_status: String,
    #[serde(rename = "selfDeclaredMadeForKids", skip_serializing_if = "Option::is_none")]
    pub self_declared_made_for_kids: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// Resolved inputs for the social publish.
#[derive(Debug, Clone, PartialEq)]
pub struct SocialBody {
    pub caption: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub share_to_feed: bool,
    pub enable_reel: bool,
    pub enable_post: bool,
    pub thumb_offset_seconds: f64,
}

/// One injected home for every default literal, shared by all entry surfaces.
#[derive(Debug, Clone)]
pub struct PublishDefaults {
    pub youtube: YoutubeBody,
    pub social: SocialBody,
}

impl Default for PublishDefaults {
    fn default() -> Self {
        PublishDefaults {
            youtube: YoutubeBody {
                snippet: Snippet {
                    title: "Daily short".to_string(),
                    description: "Published with clipcast".to_string(),
                    tags: vec!["shorts".to_string()],
                    category_id: None,
                    default_language: None,
                    default_audio_language: None,
                },
                status: Status {
                    privacy_status: "unlisted".to_string(),
                    self_declared_made_for_kids: None,
                    license: None,
                },
            },
            social: SocialBody {
                caption: None,
                hashtags: None,
                share_to_feed: true,
                enable_reel: true,
                enable_post: true,
                thumb_offset_seconds: 2.75,
            },
        }
    }
}

impl PublishDefaults {
    /// Merge sidecar overrides onto the video-host defaults.
    pub fn youtube_body(&self, doc: &MetadataDoc) -> YoutubeBody {
        let mut body = self.youtube.clone();
        let Some(overrides) = &doc.youtube else {
            return body;
        };

        if let Some(snippet) = &overrides.snippet {
            apply(&mut body.snippet.title, &snippet.title);
            apply(&mut body.snippet.description, &snippet.description);
            apply(&mut body.snippet.tags, &snippet.tags);
            apply_opt(&mut body.snippet.category_id, &snippet.category_id);
            apply_opt(&mut body.snippet.default_language, &snippet.default_language);
            apply_opt(
                &mut body.snippet.default_audio_language,
                &snippet.default_audio_language,
            );
        }
        if let Some(status) = &overrides.status {
            apply(&mut body.status.privacy_status, &status.privacy_status);
            apply_opt(
                &mut body.status.self_declared_made_for_kids,
                &status.self_declared_made_for_kids,
            );
            apply_opt(&mut body.status.license, &status.license);
        }
        body
    }

    /// Merge sidecar overrides onto the social defaults.
    pub fn social_body(&self, doc: &MetadataDoc) -> SocialBody {
        let mut body = self.social.clone();
        let Some(overrides) = &doc.instagram else {
            return body;
        };

        apply_opt(&mut body.caption, &overrides.caption);
        apply_opt(&mut body.hashtags, &overrides.hashtags);
        apply(&mut body.share_to_feed, &overrides.share_to_feed);
        apply(&mut body.enable_reel, &overrides.enable_reel);
        apply(&mut body.enable_post, &overrides.enable_post);
        apply(&mut body.thumb_offset_seconds, &overrides.thumb_offset_seconds);
        body
    }
}

fn apply<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

fn apply_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        *target = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(raw: &str) -> MetadataDoc {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn empty_document_yields_pure_defaults() {
        let defaults = PublishDefaults::default();
        let body = defaults.youtube_body(&MetadataDoc::default());
        assert_eq!(body, defaults.youtube);
        let social = defaults.social_body(&MetadataDoc::default());
        assert_eq!(social, defaults.social);
    }

    #[test]
    fn recognized_fields_override_defaults() {
        let defaults = PublishDefaults::default();
        let doc = doc(
            r#"{
                "youtube": {
                    "snippet": {"title": "Custom", "categoryId": "28"},
                    "status": {"privacyStatus": "public"}
                },
                "instagram": {"caption": "hi", "enable_post": false}
            }"#,
        );

        let body = defaults.youtube_body(&doc);
        assert_eq!(body.snippet.title, "Custom");
        assert_eq!(body.snippet.category_id.as_deref(), Some("28"));
        assert_eq!(body.status.privacy_status, "public");
        // absent keys keep defaults
        assert_eq!(body.snippet.description, defaults.youtube.snippet.description);
        assert_eq!(body.snippet.tags, defaults.youtube.snippet.tags);

        let social = defaults.social_body(&doc);
        assert_eq!(social.caption.as_deref(), Some("hi"));
        assert!(!social.enable_post);
        assert!(social.enable_reel);
        assert_eq!(social.thumb_offset_seconds, 2.75);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let defaults = PublishDefaults::default();
        let doc = doc(
            r#"{
                "youtube": {
                    "snippet": {"title": "T", "embeddable": true, "thumbnails": {}},
                    "contentDetails": {"duration": "PT1M"}
                },
                "instagram": {"caption": "C", "audience": "everyone"},
                "tiktok": {"whatever": 1}
            }"#,
        );
        let body = defaults.youtube_body(&doc);
        assert_eq!(body.snippet.title, "T");
        let social = defaults.social_body(&doc);
        assert_eq!(social.caption.as_deref(), Some("C"));
    }

    #[test]
    fn merge_is_idempotent() {
        let defaults = PublishDefaults::default();
        let doc = doc(r#"{"youtube": {"snippet": {"title": "Once"}}}"#);
        let once = defaults.youtube_body(&doc);
        let again = defaults.youtube_body(&doc);
        assert_eq!(once, again);

        // merging the merged body's defaults again yields the same result
        let layered = PublishDefaults {
            youtube: once.clone(),
            social: defaults.social.clone(),
        };
        assert_eq!(layered.youtube_body(&doc), once);
    }

    #[test]
    fn serialized_body_uses_api_casing_and_omits_unset_fields() {
        let defaults = PublishDefaults::default();
        let value = serde_json::to_value(defaults.youtube_body(&MetadataDoc::default())).unwrap();
        assert_eq!(value["status"]["privacyStatus"], "unlisted");
        assert!(value["snippet"].get("categoryId").is_none());
        assert!(value["status"].get("selfDeclaredMadeForKids").is_none());
    }

    #[test]
    fn malformed_sections_fail_to_parse() {
        let err = serde_json::from_str::<MetadataDoc>(r#"{"youtube": "nope"}"#);
        assert!(err.is_err());
    }
}
