//! Content records as the frontend consumes them.
//!
//! These mirror the documents the headless CMS serves, flattened for
//! rendering: media relations become plain URLs, tag relations become
//! embedded [`TagRecord`]s.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRecord {
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
}

/// Blog post summary as shown on the index page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub featured_image_url: Option<String>,
    pub tags: Vec<TagRecord>,
    pub published_at: Option<OffsetDateTime>,
}

/// Full blog post, fetched by slug for the detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetailRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body_html: String,
    pub featured_image_url: Option<String>,
    pub tags: Vec<TagRecord>,
    pub published_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectImage {
    pub url: Option<String>,
    pub caption: Option<String>,
}

/// Project record; the portfolio grid and the project detail page share it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub body_html: Option<String>,
    pub images: Vec<ProjectImage>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub featured: bool,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    pub username: Option<String>,
}

/// The site owner's profile, a CMS singleton.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRecord {
    pub name: String,
    pub headline: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub social_links: Vec<SocialLink>,
}
