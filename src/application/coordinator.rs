//! Fetch orchestration: freshness checks, in-flight dedup, store commits.
//!
//! `ensure_*` is the single entry point for getting content. The hot path
//! (cache hit) returns synchronously from the store. On a miss, list classes
//! fetch under a loading flag; detail classes join-or-spawn on a per-slug
//! in-flight table so concurrent callers for the same slug await one shared
//! fetch and observe the same resolved value, while distinct slugs of the
//! same class proceed independently.
//!
//! No failure ever escapes `ensure_*`: transient errors become a per-class
//! error string in the store, not-found stays uncached so a later fetch for
//! the same slug is not blocked, and callers always get a resolved
//! `Option`.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use metrics::{counter, histogram};
use tracing::{debug, warn};

use crate::cache::{ContentClass, ContentStore, DetailClass, FreshnessPolicy, ListClass};
use crate::domain::entities::{
    PostDetailRecord, PostRecord, ProfileRecord, ProjectRecord, TagRecord,
};

use super::source::ContentSource;

pub const METRIC_ENSURE_HIT_TOTAL: &str = "vetrina_ensure_hit_total";
pub const METRIC_ENSURE_MISS_TOTAL: &str = "vetrina_ensure_miss_total";
pub const METRIC_ENSURE_JOIN_TOTAL: &str = "vetrina_ensure_join_total";
pub const METRIC_FETCH_MS: &str = "vetrina_fetch_ms";

type SharedFlight<T> = Shared<BoxFuture<'static, Option<T>>>;

/// In-flight fetches for one detail class, keyed by slug.
///
/// Every slug gets its own entry holding the shared fetch future itself, so
/// concurrent fetches for distinct slugs never interfere. The entry is
/// removed before the future resolves, success or failure.
struct FlightTable<T> {
    inner: Arc<DashMap<String, SharedFlight<T>>>,
}

impl<T> FlightTable<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Join the existing flight for `slug`, or spawn `fetch` as a new one.
    ///
    /// Returns the shared flight and whether the caller joined an existing
    /// one. The fetch runs on its own task, so it completes (and clears its
    /// table entry) even if every waiter is dropped.
    fn join_or_spawn<Fut>(&self, slug: &str, fetch: impl FnOnce() -> Fut) -> (SharedFlight<T>, bool)
    where
        Fut: Future<Output = Option<T>> + Send + 'static,
    {
        use dashmap::mapref::entry::Entry;

        match self.inner.entry(slug.to_string()) {
            Entry::Occupied(entry) => (entry.get().clone(), true),
            Entry::Vacant(entry) => {
                let table = Arc::clone(&self.inner);
                let key = slug.to_string();
                let fut = fetch();
                let task = tokio::spawn(async move {
                    let out = fut.await;
                    table.remove(&key);
                    out
                });
                let flight: SharedFlight<T> =
                    async move { task.await.ok().flatten() }.boxed().shared();
                entry.insert(flight.clone());
                (flight, false)
            }
        }
    }

    fn contains(&self, slug: &str) -> bool {
        self.inner.contains_key(slug)
    }
}

/// Orchestrates content fetches against the store and freshness policy.
pub struct FetchCoordinator {
    store: Arc<ContentStore>,
    source: Arc<dyn ContentSource>,
    policy: FreshnessPolicy,
    blog_flights: FlightTable<PostDetailRecord>,
    project_flights: FlightTable<ProjectRecord>,
}

impl FetchCoordinator {
    pub fn new(
        store: Arc<ContentStore>,
        source: Arc<dyn ContentSource>,
        policy: FreshnessPolicy,
    ) -> Self {
        Self {
            store,
            source,
            policy,
            blog_flights: FlightTable::new(),
            project_flights: FlightTable::new(),
        }
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    /// Whether a detail fetch for the given slug is currently in flight.
    pub fn is_fetching(&self, class: DetailClass, slug: &str) -> bool {
        match class {
            DetailClass::BlogPost => self.blog_flights.contains(slug),
            DetailClass::Project => self.project_flights.contains(slug),
        }
    }

    // ========================================================================
    // List classes
    // ========================================================================

    pub async fn ensure_blog_posts(&self) -> Option<Vec<PostRecord>> {
        let class = ListClass::BlogPosts;
        let reading = self.store.read_blog_posts();
        if self.policy.list_fresh(class, reading.fetched_at) {
            record_hit(class.into());
            return reading.items;
        }
        record_miss(class.into());

        self.store.set_blog_posts_loading(true);
        self.store.set_blog_posts_error(None);
        let ticket = self.store.begin_write();
        let started = std::time::Instant::now();

        let out = match self.source.fetch_blog_posts().await {
            Ok(posts) => {
                if !self.store.commit_blog_posts(posts.clone(), ticket) {
                    debug!(class = class.label(), "discarded superseded list fetch");
                }
                Some(posts)
            }
            Err(err) => {
                warn!(class = class.label(), error = %err, "list fetch failed");
                self.store.set_blog_posts_error(Some(err.to_string()));
                None
            }
        };

        self.store.set_blog_posts_loading(false);
        record_fetch(class.into(), started);
        out
    }

    pub async fn ensure_projects(&self) -> Option<Vec<ProjectRecord>> {
        let class = ListClass::Projects;
        let reading = self.store.read_projects();
        if self.policy.list_fresh(class, reading.fetched_at) {
            record_hit(class.into());
            return reading.items;
        }
        record_miss(class.into());

        self.store.set_projects_loading(true);
        self.store.set_projects_error(None);
        let ticket = self.store.begin_write();
        let started = std::time::Instant::now();

        let out = match self.source.fetch_projects().await {
            Ok(projects) => {
                if !self.store.commit_projects(projects.clone(), ticket) {
                    debug!(class = class.label(), "discarded superseded list fetch");
                }
                Some(projects)
            }
            Err(err) => {
                warn!(class = class.label(), error = %err, "list fetch failed");
                self.store.set_projects_error(Some(err.to_string()));
                None
            }
        };

        self.store.set_projects_loading(false);
        record_fetch(class.into(), started);
        out
    }

    pub async fn ensure_tags(&self) -> Option<Vec<TagRecord>> {
        let class = ListClass::Tags;
        let reading = self.store.read_tags();
        if self.policy.list_fresh(class, reading.fetched_at) {
            record_hit(class.into());
            return reading.items;
        }
        record_miss(class.into());

        self.store.set_tags_loading(true);
        self.store.set_tags_error(None);
        let ticket = self.store.begin_write();
        let started = std::time::Instant::now();

        let out = match self.source.fetch_tags().await {
            Ok(tags) => {
                if !self.store.commit_tags(tags.clone(), ticket) {
                    debug!(class = class.label(), "discarded superseded list fetch");
                }
                Some(tags)
            }
            Err(err) => {
                warn!(class = class.label(), error = %err, "list fetch failed");
                self.store.set_tags_error(Some(err.to_string()));
                None
            }
        };

        self.store.set_tags_loading(false);
        record_fetch(class.into(), started);
        out
    }

    // ========================================================================
    // Profile singleton
    // ========================================================================

    pub async fn ensure_profile(&self) -> Option<ProfileRecord> {
        let class = ContentClass::Profile;
        let reading = self.store.read_profile();
        if self.policy.profile_fresh(reading.fetched_at) {
            record_hit(class);
            return reading.value;
        }
        record_miss(class);

        self.store.set_profile_loading(true);
        self.store.set_profile_error(None);
        let ticket = self.store.begin_write();
        let started = std::time::Instant::now();

        let out = match self.source.fetch_profile().await {
            Ok(Some(profile)) => {
                if !self.store.commit_profile(profile.clone(), ticket) {
                    debug!(class = class.label(), "discarded superseded profile fetch");
                }
                Some(profile)
            }
            Ok(None) => {
                debug!(class = class.label(), "profile not published");
                None
            }
            Err(err) => {
                warn!(class = class.label(), error = %err, "profile fetch failed");
                self.store.set_profile_error(Some(err.to_string()));
                None
            }
        };

        self.store.set_profile_loading(false);
        record_fetch(class, started);
        out
    }

    // ========================================================================
    // Detail classes
    // ========================================================================

    pub async fn ensure_blog_post(&self, slug: &str) -> Option<PostDetailRecord> {
        let class = DetailClass::BlogPost;
        let reading = self.store.read_blog_detail(slug);
        if self.policy.detail_fresh(class, reading.fetched_at) {
            record_hit(class.into());
            return reading.value;
        }
        record_miss(class.into());

        let (flight, joined) = self.blog_flights.join_or_spawn(slug, || {
            let store = Arc::clone(&self.store);
            let source = Arc::clone(&self.source);
            let slug = slug.to_string();
            async move {
                let ticket = store.begin_write();
                let started = std::time::Instant::now();
                let out = match source.fetch_blog_post(&slug).await {
                    Ok(Some(post)) => {
                        store.set_blog_detail_error(None);
                        if !store.commit_blog_detail(&slug, post.clone(), ticket) {
                            debug!(class = class.label(), slug, "discarded superseded detail fetch");
                        }
                        Some(post)
                    }
                    Ok(None) => {
                        // Not cached: a later fetch for this slug must not be
                        // blocked by a stale negative entry.
                        debug!(class = class.label(), slug, "detail not found");
                        None
                    }
                    Err(err) => {
                        warn!(class = class.label(), slug, error = %err, "detail fetch failed");
                        store.set_blog_detail_error(Some(err.to_string()));
                        None
                    }
                };
                record_fetch(class.into(), started);
                out
            }
        });
        if joined {
            counter!(METRIC_ENSURE_JOIN_TOTAL, "class" => class.label()).increment(1);
        }
        flight.await
    }

    pub async fn ensure_project(&self, slug: &str) -> Option<ProjectRecord> {
        let class = DetailClass::Project;
        let reading = self.store.read_project_detail(slug);
        if self.policy.detail_fresh(class, reading.fetched_at) {
            record_hit(class.into());
            return reading.value;
        }
        record_miss(class.into());

        let (flight, joined) = self.project_flights.join_or_spawn(slug, || {
            let store = Arc::clone(&self.store);
            let source = Arc::clone(&self.source);
            let slug = slug.to_string();
            async move {
                let ticket = store.begin_write();
                let started = std::time::Instant::now();
                let out = match source.fetch_project(&slug).await {
                    Ok(Some(project)) => {
                        store.set_project_detail_error(None);
                        if !store.commit_project_detail(&slug, project.clone(), ticket) {
                            debug!(class = class.label(), slug, "discarded superseded detail fetch");
                        }
                        Some(project)
                    }
                    Ok(None) => {
                        debug!(class = class.label(), slug, "detail not found");
                        None
                    }
                    Err(err) => {
                        warn!(class = class.label(), slug, error = %err, "detail fetch failed");
                        store.set_project_detail_error(Some(err.to_string()));
                        None
                    }
                };
                record_fetch(class.into(), started);
                out
            }
        });
        if joined {
            counter!(METRIC_ENSURE_JOIN_TOTAL, "class" => class.label()).increment(1);
        }
        flight.await
    }

    /// Wipe every cached entry and clock back to "never fetched".
    pub fn clear_cache(&self) {
        self.store.clear();
    }
}

fn record_hit(class: ContentClass) {
    counter!(METRIC_ENSURE_HIT_TOTAL, "class" => class.label()).increment(1);
}

fn record_miss(class: ContentClass) {
    counter!(METRIC_ENSURE_MISS_TOTAL, "class" => class.label()).increment(1);
}

fn record_fetch(class: ContentClass, started: std::time::Instant) {
    histogram!(METRIC_FETCH_MS, "class" => class.label())
        .record(started.elapsed().as_secs_f64() * 1000.0);
}
