//! Application services layer: fetch orchestration, preload, read views.

pub mod coordinator;
pub mod error;
pub mod navigation;
pub mod source;
pub mod views;

use std::sync::Arc;

use crate::cache::{CacheTtls, ContentStore, FreshnessPolicy};
use crate::config::Settings;

use coordinator::FetchCoordinator;
use navigation::{NavigationPreloader, NavigationState, Navigator};
use source::ContentSource;
use views::ContentViews;

/// Fully wired content runtime: store, coordinator, preloader and views
/// sharing one cache.
pub struct ContentRuntime {
    store: Arc<ContentStore>,
    coordinator: Arc<FetchCoordinator>,
    views: ContentViews,
    preloader: NavigationPreloader,
}

impl ContentRuntime {
    pub fn new(
        settings: &Settings,
        source: Arc<dyn ContentSource>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let store = Arc::new(ContentStore::new());
        let policy = FreshnessPolicy::new(CacheTtls::from(&settings.cache));
        let coordinator = Arc::new(FetchCoordinator::new(
            Arc::clone(&store),
            source,
            policy,
        ));
        let views = ContentViews::new(Arc::clone(&coordinator));
        let preloader = NavigationPreloader::new(
            Arc::clone(&coordinator),
            navigator,
            Arc::new(NavigationState::new()),
        );

        Self {
            store,
            coordinator,
            views,
            preloader,
        }
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    pub fn coordinator(&self) -> &Arc<FetchCoordinator> {
        &self.coordinator
    }

    pub fn views(&self) -> &ContentViews {
        &self.views
    }

    pub fn preloader(&self) -> &NavigationPreloader {
        &self.preloader
    }
}
