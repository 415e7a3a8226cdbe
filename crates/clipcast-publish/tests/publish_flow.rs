//! End-to-end pipeline tests over fake platform backends. Only the local
//! filesystem is real; host, storage, and social APIs are scripted fakes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use clipcast_core::config::Config;
use clipcast_core::metadata::{PublishDefaults, YoutubeBody};
use clipcast_core::outcome::YoutubeOutcome;
use clipcast_core::PublishResult;
use clipcast_publish::social::{ContainerRequest, ContainerStatus, SocialApi};
use clipcast_publish::{Clock, Orchestrator, SocialPublisher, UploadedVideo, VideoHost};
use clipcast_storage::{public_url, staging_key, Stager};

struct FakeHost {
    uploads: Arc<Mutex<Vec<PathBuf>>>,
    thumbnails: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl VideoHost for FakeHost {
    async fn upload(&self, video: &Path, _body: &YoutubeBody) -> PublishResult<UploadedVideo> {
        self.uploads.lock().unwrap().push(video.to_path_buf());
        Ok(UploadedVideo {
            video_id: "vid-1".to_string(),
            watch_url: "https://www.youtube.com/watch?v=vid-1".to_string(),
        })
    }

    async fn attach_thumbnail(&self, video_id: &str, _thumbnail: &Path) -> PublishResult<()> {
        self.thumbnails.lock().unwrap().push(video_id.to_string());
        Ok(())
    }
}

struct FakeStager {
    bucket: String,
    staged: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Stager for FakeStager {
    async fn stage(&self, date: &str, video: &Path) -> PublishResult<String> {
        let filename = video.file_name().unwrap().to_str().unwrap();
        let key = staging_key(date, filename);
        self.staged.lock().unwrap().push(key.clone());
        Ok(public_url(&self.bucket, &key))
    }
}

#[derive(Clone, Default)]
struct FakeSocialApi {
    requests: Arc<Mutex<Vec<ContainerRequest>>>,
}

#[async_trait]
impl SocialApi for FakeSocialApi {
    async fn create_container(&self, request: &ContainerRequest) -> PublishResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        Ok("container-9".to_string())
    }

    async fn container_status(&self, _container_id: &str) -> PublishResult<ContainerStatus> {
        Ok(ContainerStatus::Finished)
    }

    async fn publish_container(&self, container_id: &str) -> PublishResult<String> {
        Ok(format!("published-{}", container_id))
    }
}

#[derive(Clone)]
struct TestClock {
    base: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl TestClock {
    fn new() -> Self {
        TestClock {
            base: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }
}

#[async_trait]
impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        *self.offset.lock().unwrap() += duration;
    }
}

fn test_config(uploads_root: &Path) -> Config {
    Config {
        uploads_root: uploads_root.to_path_buf(),
        bucket: "test-bucket".to_string(),
        instagram_account_id: "acct".to_string(),
        instagram_access_token: "token".to_string(),
        social_api_base: "https://graph.instagram.com/v23.0".to_string(),
        youtube_upload_enabled: false,
        google: None,
        // nonexistent binary proves thumbnail failure never aborts the run
        ffmpeg_path: "/nonexistent/ffmpeg".to_string(),
        poll_interval_secs: 3,
        poll_timeout_secs: 60,
        upload_chunk_bytes: 1024 * 1024,
    }
}

fn seed_video(root: &Path, metadata: Option<&str>) -> PathBuf {
    let folder = root.join("2025/01/15");
    fs::create_dir_all(&folder).unwrap();
    let video = folder.join("clip.mp4");
    fs::write(&video, b"fake video bytes").unwrap();
    if let Some(raw) = metadata {
        fs::write(folder.join("metadata.json"), raw).unwrap();
    }
    video
}

fn social(api: FakeSocialApi) -> SocialPublisher<FakeSocialApi, TestClock> {
    SocialPublisher::new(
        api,
        TestClock::new(),
        Duration::from_secs(3),
        Duration::from_secs(60),
    )
}

#[tokio::test]
async fn full_run_with_upload_disabled() {
    let root = tempfile::tempdir().unwrap();
    seed_video(root.path(), None);

    let staged = Arc::new(Mutex::new(Vec::new()));
    let api = FakeSocialApi::default();
    let requests = api.requests.clone();
    let orchestrator = Orchestrator::<FakeHost, _, _, _>::new(
        test_config(root.path()),
        PublishDefaults::default(),
        None,
        FakeStager {
            bucket: "test-bucket".to_string(),
            staged: staged.clone(),
        },
        social(api),
    );

    let outcome = orchestrator.run("2025-01-15", None).await.unwrap();

    assert_eq!(outcome.date, "2025-01-15");
    assert!(outcome.video_file.ends_with("clip.mp4"));
    assert!(matches!(
        outcome.youtube,
        YoutubeOutcome::Skipped { skipped: true }
    ));
    assert_eq!(
        outcome.gcs_public_url,
        "https://storage.googleapis.com/test-bucket/video_assets/2025/01/15/clip.mp4"
    );
    assert_eq!(staged.lock().unwrap().as_slice(), ["video_assets/2025/01/15/clip.mp4"]);

    let reel = outcome.instagram.reel.unwrap();
    assert_eq!(reel.creation_id, "container-9");
    assert_eq!(reel.publish_id, "published-container-9");
    assert_eq!(outcome.instagram.post.unwrap(), reel);

    // the container was fed the staged public URL
    assert_eq!(
        requests.lock().unwrap()[0].video_url,
        outcome.gcs_public_url
    );
}

#[tokio::test]
async fn full_run_with_upload_enabled() {
    let root = tempfile::tempdir().unwrap();
    seed_video(
        root.path(),
        Some(r#"{"youtube": {"snippet": {"title": "Launch day"}}}"#),
    );

    let uploads = Arc::new(Mutex::new(Vec::new()));
    let host = FakeHost {
        uploads: uploads.clone(),
        thumbnails: Arc::new(Mutex::new(Vec::new())),
    };
    let mut config = test_config(root.path());
    config.youtube_upload_enabled = true;

    let orchestrator = Orchestrator::new(
        config,
        PublishDefaults::default(),
        Some(host),
        FakeStager {
            bucket: "test-bucket".to_string(),
            staged: Arc::new(Mutex::new(Vec::new())),
        },
        social(FakeSocialApi::default()),
    );

    let outcome = orchestrator.run("2025-01-15", None).await.unwrap();

    match outcome.youtube {
        YoutubeOutcome::Uploaded {
            video_id,
            watch_url,
        } => {
            assert_eq!(video_id, "vid-1");
            assert_eq!(watch_url, "https://www.youtube.com/watch?v=vid-1");
        }
        other => panic!("expected uploaded outcome, got {:?}", other),
    }
    assert_eq!(uploads.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_date_folder_fails_before_any_platform_call() {
    let root = tempfile::tempdir().unwrap();

    let api = FakeSocialApi::default();
    let requests = api.requests.clone();
    let orchestrator = Orchestrator::<FakeHost, _, _, _>::new(
        test_config(root.path()),
        PublishDefaults::default(),
        None,
        FakeStager {
            bucket: "test-bucket".to_string(),
            staged: Arc::new(Mutex::new(Vec::new())),
        },
        social(api),
    );

    let err = orchestrator.run("2025-01-15", None).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sidecar_overrides_flow_into_the_caption() {
    let root = tempfile::tempdir().unwrap();
    seed_video(
        root.path(),
        Some(
            r#"{"youtube": {"snippet": {"title": "T", "description": "D", "tags": []}},
                "instagram": {"hashtags": ["daily"]}}"#,
        ),
    );

    let api = FakeSocialApi::default();
    let requests = api.requests.clone();
    let orchestrator = Orchestrator::<FakeHost, _, _, _>::new(
        test_config(root.path()),
        PublishDefaults::default(),
        None,
        FakeStager {
            bucket: "test-bucket".to_string(),
            staged: Arc::new(Mutex::new(Vec::new())),
        },
        social(api),
    );

    orchestrator.run("2025-01-15", None).await.unwrap();
    assert_eq!(requests.lock().unwrap()[0].caption, "T\n\nD\n\n#daily");
}
