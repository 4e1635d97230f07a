//! The external content-fetch contract.
//!
//! The CMS backend is a collaborator, not part of this crate; the
//! coordinator only sees this trait. `Ok(None)` from a by-slug fetch means
//! the document does not exist, which is distinct from `Err`: a transient
//! failure that may succeed on retry.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    PostDetailRecord, PostRecord, ProfileRecord, ProjectRecord, TagRecord,
};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("content request failed: {0}")]
    Transport(String),
    #[error("content endpoint returned status {status}")]
    Status { status: u16 },
    #[error("content payload could not be decoded: {0}")]
    Decode(String),
}

impl SourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

/// Async access to the headless CMS's published content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_blog_posts(&self) -> Result<Vec<PostRecord>, SourceError>;

    async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>, SourceError>;

    async fn fetch_tags(&self) -> Result<Vec<TagRecord>, SourceError>;

    async fn fetch_profile(&self) -> Result<Option<ProfileRecord>, SourceError>;

    async fn fetch_blog_post(&self, slug: &str)
    -> Result<Option<PostDetailRecord>, SourceError>;

    async fn fetch_project(&self, slug: &str) -> Result<Option<ProjectRecord>, SourceError>;
}
