//! Date-keyed asset resolution.
//!
//! A publish run works out of `<uploads_root>/YYYY/MM/DD`: exactly one video
//! per day by convention, with an optional `metadata.json` sidecar next to it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::NaiveDate;
use tracing::{info, warn};

use clipcast_core::metadata::MetadataDoc;
use clipcast_core::{PublishError, PublishResult};

pub const METADATA_FILENAME: &str = "metadata.json";

/// Resolve `root/YYYY/MM/DD` for an ISO `YYYY-MM-DD` date string.
///
/// The date must be a real calendar date; the folder must already exist.
pub fn resolve_date_folder(root: &Path, date: &str) -> PublishResult<PathBuf> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| PublishError::Parse(format!("Invalid date '{}': {}", date, e)))?;

    let folder = root.join(parsed.format("%Y/%m/%d").to_string());
    if !folder.is_dir() {
        return Err(PublishError::NotFound(format!(
            "Upload folder does not exist: {}",
            folder.display()
        )));
    }
    Ok(folder)
}

/// Pick the video to publish.
///
/// An explicit override (absolute, or relative to the date folder) must point
/// at an existing file. Otherwise the folder is scanned for `.mp4` files
/// (case-insensitive) and the most recently modified one wins, with the path
/// as tie-break so the choice is deterministic.
pub fn find_video_file(folder: &Path, explicit: Option<&Path>) -> PublishResult<PathBuf> {
    if let Some(path) = explicit {
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            folder.join(path)
        };
        if !candidate.is_file() {
            return Err(PublishError::NotFound(format!(
                "Requested video file does not exist: {}",
                candidate.display()
            )));
        }
        return Ok(candidate);
    }

    let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        let is_mp4 = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));
        if !is_mp4 || !path.is_file() {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        candidates.push((modified, path));
    }

    candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    if candidates.len() > 1 {
        warn!(
            folder = %folder.display(),
            count = candidates.len(),
            chosen = %candidates[0].1.display(),
            "multiple videos in upload folder, using most recent"
        );
    }

    candidates
        .into_iter()
        .next()
        .map(|(_, path)| path)
        .ok_or_else(|| {
            PublishError::NotFound(format!("No .mp4 file found in {}", folder.display()))
        })
}

/// Load the optional sidecar. A missing file is normal and yields an empty
/// document; a present but malformed file aborts the run.
pub fn load_metadata(folder: &Path) -> PublishResult<MetadataDoc> {
    let path = folder.join(METADATA_FILENAME);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(folder = %folder.display(), "no metadata sidecar, using defaults");
            return Ok(MetadataDoc::default());
        }
        Err(e) => return Err(e.into()),
    };
    let doc = serde_json::from_str(&raw)
        .map_err(|e| PublishError::Parse(format!("Invalid {}: {}", path.display(), e)))?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{File, FileTimes};
    use std::io::Write;
    use std::time::{Duration, SystemTime};

    fn write_file(path: &Path, contents: &str) {
        let mut f = File::create(path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    fn set_mtime(path: &Path, when: SystemTime) {
        let f = File::options().write(true).open(path).unwrap();
        f.set_times(FileTimes::new().set_modified(when)).unwrap();
    }

    #[test]
    fn resolves_existing_date_folder() {
        let root = tempfile::tempdir().unwrap();
        let folder = root.path().join("2025/01/15");
        fs::create_dir_all(&folder).unwrap();

        let resolved = resolve_date_folder(root.path(), "2025-01-15").unwrap();
        assert_eq!(resolved, folder);
    }

    #[test]
    fn missing_folder_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let err = resolve_date_folder(root.path(), "2025-01-15").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn bad_date_is_a_parse_error() {
        let root = tempfile::tempdir().unwrap();
        for bad in ["2025-13-40", "15-01-2025", "today", "2025/01/15"] {
            let err = resolve_date_folder(root.path(), bad).unwrap_err();
            assert_eq!(err.error_code(), "PARSE_ERROR", "input: {}", bad);
        }
    }

    #[test]
    fn picks_most_recent_mp4() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.mp4");
        let new = dir.path().join("new.MP4");
        write_file(&old, "a");
        write_file(&new, "b");
        let base = SystemTime::now();
        set_mtime(&old, base - Duration::from_secs(3600));
        set_mtime(&new, base);

        let picked = find_video_file(dir.path(), None).unwrap();
        assert_eq!(picked, new);
    }

    #[test]
    fn equal_mtimes_break_ties_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp4");
        let b = dir.path().join("b.mp4");
        write_file(&a, "a");
        write_file(&b, "b");
        let when = SystemTime::now();
        set_mtime(&a, when);
        set_mtime(&b, when);

        assert_eq!(find_video_file(dir.path(), None).unwrap(), a);
    }

    #[test]
    fn ignores_non_video_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("metadata.json"), "{}");
        write_file(&dir.path().join("notes.txt"), "x");
        let err = find_video_file(dir.path(), None).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn explicit_override_is_resolved_relative_to_folder() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("special.mp4");
        write_file(&target, "v");
        write_file(&dir.path().join("other.mp4"), "v");

        let picked = find_video_file(dir.path(), Some(Path::new("special.mp4"))).unwrap();
        assert_eq!(picked, target);

        let err = find_video_file(dir.path(), Some(Path::new("absent.mp4"))).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn missing_sidecar_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load_metadata(dir.path()).unwrap();
        assert!(doc.youtube.is_none());
        assert!(doc.instagram.is_none());
    }

    #[test]
    fn malformed_sidecar_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join(METADATA_FILENAME), "{not json");
        let err = load_metadata(dir.path()).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn valid_sidecar_parses() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            &dir.path().join(METADATA_FILENAME),
            r#"{"instagram": {"caption": "hello"}}"#,
        );
        let doc = load_metadata(dir.path()).unwrap();
        assert_eq!(
            doc.instagram.unwrap().caption.as_deref(),
            Some("hello")
        );
    }
}
