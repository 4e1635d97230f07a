//! Read-only accessors for pages and components.
//!
//! A view call is what a page does on mount or key change: it reads the
//! store synchronously (no I/O on the calling path) and schedules the
//! matching `ensure_*` on the runtime as a side effect, so stale or missing
//! data starts refreshing while the snapshot renders. Components re-read on
//! their next render to pick up the refreshed value.

use std::sync::Arc;

use crate::cache::DetailClass;
use crate::domain::entities::{
    PostDetailRecord, PostRecord, ProfileRecord, ProjectRecord, TagRecord,
};

use super::coordinator::FetchCoordinator;

/// Snapshot of a list class for rendering.
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    /// `None` until the first successful fetch.
    pub data: Option<Vec<T>>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Snapshot of a single detail entry (or the profile) for rendering.
#[derive(Debug, Clone)]
pub struct DetailSnapshot<T> {
    /// `None` when absent: never fetched, not found, or failed.
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// The UI read surface over the content cache.
pub struct ContentViews {
    coordinator: Arc<FetchCoordinator>,
}

impl ContentViews {
    pub fn new(coordinator: Arc<FetchCoordinator>) -> Self {
        Self { coordinator }
    }

    pub fn blog_posts(&self) -> ListSnapshot<PostRecord> {
        let coordinator = Arc::clone(&self.coordinator);
        tokio::spawn(async move {
            coordinator.ensure_blog_posts().await;
        });

        let reading = self.coordinator.store().read_blog_posts();
        ListSnapshot {
            data: reading.items,
            is_loading: reading.is_loading,
            error: reading.error,
        }
    }

    pub fn projects(&self) -> ListSnapshot<ProjectRecord> {
        let coordinator = Arc::clone(&self.coordinator);
        tokio::spawn(async move {
            coordinator.ensure_projects().await;
        });

        let reading = self.coordinator.store().read_projects();
        ListSnapshot {
            data: reading.items,
            is_loading: reading.is_loading,
            error: reading.error,
        }
    }

    pub fn tags(&self) -> ListSnapshot<TagRecord> {
        let coordinator = Arc::clone(&self.coordinator);
        tokio::spawn(async move {
            coordinator.ensure_tags().await;
        });

        let reading = self.coordinator.store().read_tags();
        ListSnapshot {
            data: reading.items,
            is_loading: reading.is_loading,
            error: reading.error,
        }
    }

    pub fn profile(&self) -> DetailSnapshot<ProfileRecord> {
        let coordinator = Arc::clone(&self.coordinator);
        tokio::spawn(async move {
            coordinator.ensure_profile().await;
        });

        let reading = self.coordinator.store().read_profile();
        DetailSnapshot {
            data: reading.value,
            is_loading: reading.is_loading,
            error: reading.error,
        }
    }

    pub fn blog_post(&self, slug: &str) -> DetailSnapshot<PostDetailRecord> {
        let coordinator = Arc::clone(&self.coordinator);
        let owned = slug.to_string();
        tokio::spawn(async move {
            coordinator.ensure_blog_post(&owned).await;
        });

        let reading = self.coordinator.store().read_blog_detail(slug);
        DetailSnapshot {
            data: reading.value,
            is_loading: self.coordinator.is_fetching(DetailClass::BlogPost, slug),
            error: reading.error,
        }
    }

    pub fn project(&self, slug: &str) -> DetailSnapshot<ProjectRecord> {
        let coordinator = Arc::clone(&self.coordinator);
        let owned = slug.to_string();
        tokio::spawn(async move {
            coordinator.ensure_project(&owned).await;
        });

        let reading = self.coordinator.store().read_project_detail(slug);
        DetailSnapshot {
            data: reading.value,
            is_loading: self.coordinator.is_fetching(DetailClass::Project, slug),
            error: reading.error,
        }
    }

    /// Drop every cached entry; the next view call refetches everything.
    pub fn clear_cache(&self) {
        self.coordinator.clear_cache();
    }
}
