//! Vetrina: content cache and preload coordinator for a personal
//! blog/portfolio frontend backed by a headless CMS.
//!
//! The crate is organised in layers:
//!
//! - [`domain`]: content records, comment-tree assembly, detail routes.
//! - [`cache`]: the process-wide store and freshness policy. Memory-only;
//!   everything resets on process restart.
//! - [`application`]: the fetch coordinator (dedup, ordering, error
//!   conversion), the navigation preloader and the UI read views.
//! - [`infra`]: the CMS HTTP adapter and telemetry bootstrap.
//! - [`config`]: layered settings (file → environment).
//!
//! A frontend wires it up once and shares it process-wide:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use vetrina::application::ContentRuntime;
//! use vetrina::application::navigation::Navigator;
//! use vetrina::config::Settings;
//! use vetrina::infra::http::HttpContentSource;
//!
//! struct RouterBridge;
//!
//! impl Navigator for RouterBridge {
//!     fn navigate(&self, path: &str) {
//!         // hand the path to the routing primitive
//!         let _ = path;
//!     }
//! }
//!
//! # fn main() -> Result<(), vetrina::application::error::AppError> {
//! let settings = Settings::load(None)?;
//! vetrina::infra::telemetry::init(&settings.logging)?;
//!
//! let source = Arc::new(HttpContentSource::new(&settings.source)?);
//! let runtime = ContentRuntime::new(&settings, source, Arc::new(RouterBridge));
//!
//! let snapshot = runtime.views().blog_posts();
//! let _ = snapshot.is_loading;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;

pub use application::ContentRuntime;
pub use application::coordinator::FetchCoordinator;
pub use application::navigation::{NavigationPreloader, NavigationState, Navigator};
pub use application::source::{ContentSource, SourceError};
pub use application::views::{ContentViews, DetailSnapshot, ListSnapshot};
pub use cache::{CacheTtls, ContentStore, FreshnessPolicy};
pub use config::Settings;
