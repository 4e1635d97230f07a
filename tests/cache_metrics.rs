//! Verifies the coordinator emits its counters and histograms under the
//! documented names.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::debugging::DebuggingRecorder;
use time::OffsetDateTime;
use uuid::Uuid;
use vetrina::application::coordinator::{
    METRIC_ENSURE_HIT_TOTAL, METRIC_ENSURE_JOIN_TOTAL, METRIC_ENSURE_MISS_TOTAL, METRIC_FETCH_MS,
};
use vetrina::application::source::{ContentSource, SourceError};
use vetrina::cache::{CacheTtls, ContentStore, FreshnessPolicy};
use vetrina::domain::entities::{
    PostDetailRecord, PostRecord, ProfileRecord, ProjectRecord, TagRecord,
};
use vetrina::FetchCoordinator;

struct StaticSource;

#[async_trait]
impl ContentSource for StaticSource {
    async fn fetch_blog_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        Ok(vec![PostRecord {
            id: Uuid::new_v4(),
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            excerpt: String::new(),
            featured_image_url: None,
            tags: Vec::new(),
            published_at: Some(OffsetDateTime::now_utc()),
        }])
    }

    async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>, SourceError> {
        Ok(Vec::new())
    }

    async fn fetch_tags(&self) -> Result<Vec<TagRecord>, SourceError> {
        Ok(Vec::new())
    }

    async fn fetch_profile(&self) -> Result<Option<ProfileRecord>, SourceError> {
        Ok(None)
    }

    async fn fetch_blog_post(
        &self,
        slug: &str,
    ) -> Result<Option<PostDetailRecord>, SourceError> {
        // Latency makes the second concurrent caller join the first flight.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        Ok(Some(PostDetailRecord {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            title: slug.to_string(),
            excerpt: String::new(),
            body_html: String::new(),
            featured_image_url: None,
            tags: Vec::new(),
            published_at: Some(OffsetDateTime::now_utc()),
            updated_at: None,
        }))
    }

    async fn fetch_project(&self, slug: &str) -> Result<Option<ProjectRecord>, SourceError> {
        let _ = slug;
        Ok(None)
    }
}

#[tokio::test(start_paused = true)]
async fn ensure_paths_emit_expected_metric_names() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("install debugging recorder");

    let coordinator = Arc::new(FetchCoordinator::new(
        Arc::new(ContentStore::new()),
        Arc::new(StaticSource),
        FreshnessPolicy::new(CacheTtls::default()),
    ));

    // Miss then hit on the list path, a joined pair on the detail path.
    coordinator.ensure_blog_posts().await;
    coordinator.ensure_blog_posts().await;
    tokio::join!(
        coordinator.ensure_blog_post("hello"),
        coordinator.ensure_blog_post("hello"),
    );

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    for metric in [
        METRIC_ENSURE_HIT_TOTAL,
        METRIC_ENSURE_MISS_TOTAL,
        METRIC_ENSURE_JOIN_TOTAL,
        METRIC_FETCH_MS,
    ] {
        assert!(names.contains(metric), "missing metric {metric}: {names:?}");
    }
}
