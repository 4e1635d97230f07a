//! Link-activation preload and navigation state.
//!
//! The preloader sits between a link click and the routing primitive: it
//! recognises detail routes, warms the cache through the coordinator, then
//! delegates to the real navigation. Preload delays navigation but never
//! cancels it; pages reached by other means fetch for themselves on mount,
//! so the preload is an optimization, not a correctness dependency.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::debug;

use crate::cache::lock::{rw_read, rw_write};
use crate::domain::routes::DetailRoute;

use super::coordinator::FetchCoordinator;

const SOURCE: &str = "application::navigation";

/// How many recent paths to keep.
const HISTORY_LIMIT: usize = 10;

/// How long after delegating navigation the `is_navigating` flag stays set.
/// An approximation of render completion, deliberately decoupled from it.
const NAVIGATING_RESET_DELAY: Duration = Duration::from_millis(200);

/// The routing primitive that performs the actual URL transition.
///
/// Fire-and-forget; assumed to always succeed at the routing level.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

struct NavInner {
    is_navigating: bool,
    current_path: String,
    history: VecDeque<String>,
}

/// Shared navigation state: the in-transition flag, the current path and a
/// bounded FIFO of recently visited paths.
pub struct NavigationState {
    inner: RwLock<NavInner>,
}

impl NavigationState {
    pub fn new() -> Self {
        let mut history = VecDeque::with_capacity(HISTORY_LIMIT);
        history.push_back("/".to_string());
        Self {
            inner: RwLock::new(NavInner {
                is_navigating: false,
                current_path: "/".to_string(),
                history,
            }),
        }
    }

    pub fn is_navigating(&self) -> bool {
        rw_read(&self.inner, SOURCE, "is_navigating").is_navigating
    }

    pub fn current_path(&self) -> String {
        rw_read(&self.inner, SOURCE, "current_path")
            .current_path
            .clone()
    }

    pub fn history(&self) -> Vec<String> {
        rw_read(&self.inner, SOURCE, "history")
            .history
            .iter()
            .cloned()
            .collect()
    }

    pub fn set_navigating(&self, navigating: bool) {
        rw_write(&self.inner, SOURCE, "set_navigating").is_navigating = navigating;
    }

    pub fn record_path(&self, path: &str) {
        let mut inner = rw_write(&self.inner, SOURCE, "record_path");
        inner.current_path = path.to_string();
        if inner.history.len() == HISTORY_LIMIT {
            inner.history.pop_front();
        }
        inner.history.push_back(path.to_string());
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Intercepts link activation to warm the cache before the route changes.
pub struct NavigationPreloader {
    coordinator: Arc<FetchCoordinator>,
    navigator: Arc<dyn Navigator>,
    state: Arc<NavigationState>,
}

impl NavigationPreloader {
    pub fn new(
        coordinator: Arc<FetchCoordinator>,
        navigator: Arc<dyn Navigator>,
        state: Arc<NavigationState>,
    ) -> Self {
        Self {
            coordinator,
            navigator,
            state,
        }
    }

    pub fn state(&self) -> &Arc<NavigationState> {
        &self.state
    }

    /// Handle a link activation for `target`.
    ///
    /// Detail routes are preloaded before the navigator is invoked; preload
    /// failures are silent and navigation always proceeds. Once navigation
    /// has been delegated, the `is_navigating` flag resets after a fixed
    /// delay on a spawned task so the caller is not held up.
    pub async fn activate(&self, target: &str) {
        self.state.set_navigating(true);

        match DetailRoute::parse(target) {
            Some(DetailRoute::BlogPost(slug)) => {
                let _ = self.coordinator.ensure_blog_post(&slug).await;
            }
            Some(DetailRoute::Project(slug)) => {
                let _ = self.coordinator.ensure_project(&slug).await;
            }
            None => {
                debug!(target, "no detail preload for path");
            }
        }

        self.state.record_path(target);
        self.navigator.navigate(target);

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(NAVIGATING_RESET_DELAY).await;
            state.set_navigating(false);
        });
    }
}
