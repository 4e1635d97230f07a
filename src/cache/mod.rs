//! Vetrina content cache.
//!
//! Keyed, time-bounded storage for fetched content:
//!
//! - **Store**: keyed maps of content plus per-class (lists) or per-slug
//!   (details) freshness clocks; pure data, no I/O.
//! - **Freshness**: decides cache-hit vs. cache-miss from a clock and the
//!   class's configured max-age.
//!
//! Everything here is synchronous; the async orchestration lives in
//! [`crate::application::coordinator`].

mod config;
mod freshness;
mod keys;
pub(crate) mod lock;
mod store;

pub use config::CacheTtls;
pub use freshness::FreshnessPolicy;
pub use keys::{ContentClass, DetailClass, ListClass};
pub use store::{ContentStore, DetailReading, ListReading, SingletonReading, WriteTicket};
