//! Infrastructure adapters: CMS HTTP client and telemetry bootstrap.

pub mod error;
pub mod http;
pub mod telemetry;
