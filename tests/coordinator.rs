//! Coordinator behavior: freshness, dedup, not-found and ordering.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;
use vetrina::application::source::{ContentSource, SourceError};
use vetrina::cache::{CacheTtls, ContentStore, FreshnessPolicy};
use vetrina::domain::entities::{
    PostDetailRecord, PostRecord, ProfileRecord, ProjectRecord, TagRecord,
};
use vetrina::FetchCoordinator;

fn post_detail(slug: &str, title: &str) -> PostDetailRecord {
    PostDetailRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: title.to_string(),
        excerpt: String::new(),
        body_html: format!("<p>{title}</p>"),
        featured_image_url: None,
        tags: Vec::new(),
        published_at: Some(OffsetDateTime::now_utc()),
        updated_at: None,
    }
}

fn post(slug: &str) -> PostRecord {
    PostRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: slug.to_string(),
        excerpt: String::new(),
        featured_image_url: None,
        tags: Vec::new(),
        published_at: Some(OffsetDateTime::now_utc()),
    }
}

/// Scripted CMS stand-in with call counting, optional latency, scripted
/// missing slugs and a failure switch.
#[derive(Default)]
struct ScriptedSource {
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    latency: Option<Duration>,
    missing_slugs: Mutex<HashSet<String>>,
    fail_everything: std::sync::atomic::AtomicBool,
}

impl ScriptedSource {
    fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Default::default()
        }
    }

    fn mark_missing(&self, slug: &str) {
        self.missing_slugs
            .lock()
            .expect("missing_slugs lock")
            .insert(slug.to_string());
    }

    fn mark_present(&self, slug: &str) {
        self.missing_slugs
            .lock()
            .expect("missing_slugs lock")
            .remove(slug);
    }

    fn set_failing(&self, failing: bool) {
        self.fail_everything.store(failing, Ordering::SeqCst);
    }

    fn is_missing(&self, slug: &str) -> bool {
        self.missing_slugs
            .lock()
            .expect("missing_slugs lock")
            .contains(slug)
    }

    async fn simulate(&self) -> Result<(), SourceError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_everything.load(Ordering::SeqCst) {
            return Err(SourceError::transport("connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentSource for ScriptedSource {
    async fn fetch_blog_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        Ok(vec![post("alpha"), post("beta")])
    }

    async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>, SourceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        Ok(Vec::new())
    }

    async fn fetch_tags(&self) -> Result<Vec<TagRecord>, SourceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        Ok(vec![TagRecord {
            name: "Rust".to_string(),
            slug: "rust".to_string(),
            color: None,
        }])
    }

    async fn fetch_profile(&self) -> Result<Option<ProfileRecord>, SourceError> {
        self.simulate().await?;
        Ok(None)
    }

    async fn fetch_blog_post(
        &self,
        slug: &str,
    ) -> Result<Option<PostDetailRecord>, SourceError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        if self.is_missing(slug) {
            return Ok(None);
        }
        Ok(Some(post_detail(slug, slug)))
    }

    async fn fetch_project(&self, slug: &str) -> Result<Option<ProjectRecord>, SourceError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;
        let _ = slug;
        Ok(None)
    }
}

fn coordinator(source: Arc<ScriptedSource>) -> Arc<FetchCoordinator> {
    Arc::new(FetchCoordinator::new(
        Arc::new(ContentStore::new()),
        source,
        FreshnessPolicy::new(CacheTtls::default()),
    ))
}

#[tokio::test(start_paused = true)]
async fn list_freshness_gates_network_calls() {
    let source = Arc::new(ScriptedSource::default());
    let coordinator = coordinator(Arc::clone(&source));

    assert!(coordinator.ensure_blog_posts().await.is_some());
    assert!(coordinator.ensure_blog_posts().await.is_some());
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);

    // Past the 10 minute window the cache is stale again.
    tokio::time::advance(Duration::from_secs(601)).await;
    assert!(coordinator.ensure_blog_posts().await.is_some());
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn detail_hit_within_window_issues_no_fetch() {
    let source = Arc::new(ScriptedSource::default());
    let coordinator = coordinator(Arc::clone(&source));

    let first = coordinator
        .ensure_blog_post("hello-world")
        .await
        .expect("first fetch resolves");
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(60)).await;
    let second = coordinator
        .ensure_blog_post("hello-world")
        .await
        .expect("cache hit resolves");
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.id, second.id);
}

#[tokio::test(start_paused = true)]
async fn concurrent_same_slug_callers_share_one_fetch() {
    let source = Arc::new(ScriptedSource::with_latency(Duration::from_millis(50)));
    let coordinator = coordinator(Arc::clone(&source));

    let (a, b) = tokio::join!(
        coordinator.ensure_blog_post("k"),
        coordinator.ensure_blog_post("k"),
    );

    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);
    let a = a.expect("first caller resolves");
    let b = b.expect("second caller resolves");
    assert_eq!(a.id, b.id);
}

#[tokio::test(start_paused = true)]
async fn distinct_slugs_of_one_class_fetch_independently() {
    let source = Arc::new(ScriptedSource::with_latency(Duration::from_millis(50)));
    let coordinator = coordinator(Arc::clone(&source));

    let (a, b) = tokio::join!(
        coordinator.ensure_blog_post("a"),
        coordinator.ensure_blog_post("b"),
    );

    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 2);
    assert_eq!(a.expect("a resolves").slug, "a");
    assert_eq!(b.expect("b resolves").slug, "b");
}

#[tokio::test(start_paused = true)]
async fn not_found_is_not_negatively_cached() {
    let source = Arc::new(ScriptedSource::default());
    source.mark_missing("ghost");
    let coordinator = coordinator(Arc::clone(&source));

    assert!(coordinator.ensure_blog_post("ghost").await.is_none());
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);

    // The document gets published; the next ensure must fetch again.
    source.mark_present("ghost");
    let found = coordinator.ensure_blog_post("ghost").await;
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 2);
    assert!(found.is_some());
}

#[tokio::test(start_paused = true)]
async fn not_found_leaves_other_entries_intact() {
    let source = Arc::new(ScriptedSource::default());
    source.mark_missing("a");
    let coordinator = coordinator(Arc::clone(&source));

    coordinator.ensure_blog_post("b").await.expect("b resolves");
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);

    assert!(coordinator.ensure_blog_post("a").await.is_none());

    // "b" is still fresh: answered from cache, no third call.
    assert!(coordinator.ensure_blog_post("b").await.is_some());
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn transient_failure_records_error_and_resolves_none() {
    let source = Arc::new(ScriptedSource::default());
    source.set_failing(true);
    let coordinator = coordinator(Arc::clone(&source));

    assert!(coordinator.ensure_blog_posts().await.is_none());
    let reading = coordinator.store().read_blog_posts();
    assert!(reading.error.is_some());
    assert!(!reading.is_loading);
    assert!(reading.items.is_none());

    // Recovery clears the recorded error.
    source.set_failing(false);
    tokio::time::advance(Duration::from_secs(601)).await;
    assert!(coordinator.ensure_blog_posts().await.is_some());
    assert!(coordinator.store().read_blog_posts().error.is_none());
}

#[tokio::test(start_paused = true)]
async fn fetch_in_flight_across_clear_cannot_resurrect_stale_data() {
    let source = Arc::new(ScriptedSource::with_latency(Duration::from_millis(50)));
    let coordinator = coordinator(Arc::clone(&source));

    let racing = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.ensure_blog_post("k").await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    coordinator.clear_cache();

    let fetched = racing.await.expect("task completes");
    // The caller still gets the response it asked for...
    assert!(fetched.is_some());
    // ...but the store stays empty: the write ticket predates the clear.
    assert!(coordinator.store().read_blog_detail("k").value.is_none());
}

#[tokio::test(start_paused = true)]
async fn clear_forces_refetch_of_everything() {
    let source = Arc::new(ScriptedSource::default());
    let coordinator = coordinator(Arc::clone(&source));

    coordinator.ensure_blog_posts().await;
    coordinator.ensure_blog_post("k").await;
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);

    coordinator.clear_cache();

    coordinator.ensure_blog_posts().await;
    coordinator.ensure_blog_post("k").await;
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 2);
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 2);
}
