//! Navigation preload: fetch-before-navigate ordering and failure behavior.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;
use vetrina::application::source::{ContentSource, SourceError};
use vetrina::cache::{CacheTtls, ContentStore, FreshnessPolicy};
use vetrina::domain::entities::{
    PostDetailRecord, PostRecord, ProfileRecord, ProjectRecord, TagRecord,
};
use vetrina::{FetchCoordinator, NavigationPreloader, NavigationState, Navigator};

/// Ordered event log shared between the content source and the navigator so
/// tests can assert that the preload completed before navigation happened.
type EventLog = Arc<Mutex<Vec<String>>>;

fn log(events: &EventLog, event: impl Into<String>) {
    events.lock().expect("event log lock").push(event.into());
}

struct LoggingSource {
    events: EventLog,
    failing: AtomicBool,
}

#[async_trait]
impl ContentSource for LoggingSource {
    async fn fetch_blog_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        Ok(Vec::new())
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
        // A little latency so a navigate racing ahead of the fetch would show
        // up in the log order.
        tokio::time::sleep(Duration::from_millis(30)).await;
        if self.failing.load(Ordering::SeqCst) {
            log(&self.events, format!("fetch-failed:{slug}"));
            return Err(SourceError::transport("connection reset"));
        }
        log(&self.events, format!("fetched:{slug}"));
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

struct LoggingNavigator {
    events: EventLog,
}

impl Navigator for LoggingNavigator {
    fn navigate(&self, path: &str) {
        log(&self.events, format!("navigated:{path}"));
    }
}

fn preloader(failing: bool) -> (NavigationPreloader, Arc<FetchCoordinator>, EventLog) {
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let source = Arc::new(LoggingSource {
        events: Arc::clone(&events),
        failing: AtomicBool::new(failing),
    });
    let coordinator = Arc::new(FetchCoordinator::new(
        Arc::new(ContentStore::new()),
        source,
        FreshnessPolicy::new(CacheTtls::default()),
    ));
    let preloader = NavigationPreloader::new(
        Arc::clone(&coordinator),
        Arc::new(LoggingNavigator {
            events: Arc::clone(&events),
        }),
        Arc::new(NavigationState::new()),
    );
    (preloader, coordinator, events)
}

#[tokio::test(start_paused = true)]
async fn detail_link_fetches_before_navigating() {
    let (preloader, coordinator, events) = preloader(false);

    preloader.activate("/blog/hello-world").await;

    let events = events.lock().expect("event log lock").clone();
    assert_eq!(
        events,
        vec![
            "fetched:hello-world".to_string(),
            "navigated:/blog/hello-world".to_string(),
        ]
    );
    assert!(
        coordinator
            .store()
            .read_blog_detail("hello-world")
            .value
            .is_some()
    );
    assert_eq!(preloader.state().current_path(), "/blog/hello-world");
}

#[tokio::test(start_paused = true)]
async fn non_detail_path_navigates_without_fetching() {
    let (preloader, _coordinator, events) = preloader(false);

    preloader.activate("/about").await;

    let events = events.lock().expect("event log lock").clone();
    assert_eq!(events, vec!["navigated:/about".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn navigation_proceeds_when_preload_fails() {
    let (preloader, coordinator, events) = preloader(true);

    preloader.activate("/blog/hello-world").await;

    let events = events.lock().expect("event log lock").clone();
    assert_eq!(
        events,
        vec![
            "fetch-failed:hello-world".to_string(),
            "navigated:/blog/hello-world".to_string(),
        ]
    );
    assert!(
        coordinator
            .store()
            .read_blog_detail("hello-world")
            .value
            .is_none()
    );
}

#[tokio::test(start_paused = true)]
async fn navigating_flag_resets_after_delay() {
    let (preloader, _coordinator, _events) = preloader(false);

    preloader.activate("/blog/hello-world").await;
    assert!(preloader.state().is_navigating());

    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(250)).await;
    tokio::task::yield_now().await;
    assert!(!preloader.state().is_navigating());
}
