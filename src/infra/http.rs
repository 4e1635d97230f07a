//! HTTP adapter for the headless CMS content API.
//!
//! Implements [`ContentSource`] against the CMS REST endpoints. The wire
//! shapes are the CMS's camelCase view models; they are decoded here and
//! mapped into domain records so nothing above this module knows about the
//! wire format. A 404 maps to `Ok(None)` (the document does not exist);
//! every other non-success status is a transient failure.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

use crate::application::source::{ContentSource, SourceError};
use crate::config::SourceSettings;
use crate::domain::entities::{
    PostDetailRecord, PostRecord, ProfileRecord, ProjectImage, ProjectRecord, SocialLink,
    TagRecord,
};

use super::error::InfraError;

const BLOG_POSTS_PATH: &str = "api/blog-posts";
const PROJECTS_PATH: &str = "api/projects";
const TAGS_PATH: &str = "api/tags";
const PROFILE_PATH: &str = "api/profile";

/// Content source backed by the CMS REST API.
pub struct HttpContentSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpContentSource {
    pub fn new(settings: &SourceSettings) -> Result<Self, InfraError> {
        let mut base = Url::parse(&settings.base_url).map_err(|err| {
            InfraError::configuration(format!(
                "invalid content source base url `{}`: {err}",
                settings.base_url
            ))
        })?;
        // Url::join treats a base without a trailing slash as a file path and
        // would drop its last segment.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|err| InfraError::http(format!("failed to build http client: {err}")))?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        self.base
            .join(path)
            .map_err(|err| SourceError::transport(format!("invalid endpoint `{path}`: {err}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| SourceError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| SourceError::decode(err.to_string()))
    }

    /// Like [`Self::get`], but a 404 (or a JSON `null` body) is "absent".
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, SourceError> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| SourceError::transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Option<T>>()
            .await
            .map_err(|err| SourceError::decode(err.to_string()))
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_blog_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        let posts: Vec<ApiPost> = self.get(BLOG_POSTS_PATH).await?;
        Ok(posts.into_iter().map(ApiPost::into_record).collect())
    }

    async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>, SourceError> {
        let projects: Vec<ApiProject> = self.get(PROJECTS_PATH).await?;
        Ok(projects.into_iter().map(ApiProject::into_record).collect())
    }

    async fn fetch_tags(&self) -> Result<Vec<TagRecord>, SourceError> {
        let tags: Vec<ApiTag> = self.get(TAGS_PATH).await?;
        Ok(tags.into_iter().map(ApiTag::into_record).collect())
    }

    async fn fetch_profile(&self) -> Result<Option<ProfileRecord>, SourceError> {
        let profile: Option<ApiProfile> = self.get_optional(PROFILE_PATH).await?;
        Ok(profile.map(ApiProfile::into_record))
    }

    async fn fetch_blog_post(
        &self,
        slug: &str,
    ) -> Result<Option<PostDetailRecord>, SourceError> {
        let post: Option<ApiPostDetail> =
            self.get_optional(&format!("{BLOG_POSTS_PATH}/{slug}")).await?;
        Ok(post.map(ApiPostDetail::into_record))
    }

    async fn fetch_project(&self, slug: &str) -> Result<Option<ProjectRecord>, SourceError> {
        let project: Option<ApiProject> =
            self.get_optional(&format!("{PROJECTS_PATH}/{slug}")).await?;
        Ok(project.map(ApiProject::into_record))
    }
}

// ============================================================================
// Wire DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTag {
    name: String,
    slug: String,
    #[serde(default)]
    color: Option<String>,
}

impl ApiTag {
    fn into_record(self) -> TagRecord {
        TagRecord {
            name: self.name,
            slug: self.slug,
            color: self.color,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPost {
    id: Uuid,
    slug: String,
    title: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    featured_image_url: Option<String>,
    #[serde(default)]
    tags: Vec<ApiTag>,
    #[serde(default, with = "time::serde::iso8601::option")]
    published_at: Option<OffsetDateTime>,
}

impl ApiPost {
    fn into_record(self) -> PostRecord {
        PostRecord {
            id: self.id,
            slug: self.slug,
            title: self.title,
            excerpt: self.excerpt,
            featured_image_url: self.featured_image_url,
            tags: self.tags.into_iter().map(ApiTag::into_record).collect(),
            published_at: self.published_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPostDetail {
    id: Uuid,
    slug: String,
    title: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    body_html: String,
    #[serde(default)]
    featured_image_url: Option<String>,
    #[serde(default)]
    tags: Vec<ApiTag>,
    #[serde(default, with = "time::serde::iso8601::option")]
    published_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::iso8601::option")]
    updated_at: Option<OffsetDateTime>,
}

impl ApiPostDetail {
    fn into_record(self) -> PostDetailRecord {
        PostDetailRecord {
            id: self.id,
            slug: self.slug,
            title: self.title,
            excerpt: self.excerpt,
            body_html: self.body_html,
            featured_image_url: self.featured_image_url,
            tags: self.tags.into_iter().map(ApiTag::into_record).collect(),
            published_at: self.published_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiProjectImage {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    caption: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiProject {
    id: Uuid,
    slug: String,
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    body_html: Option<String>,
    #[serde(default)]
    images: Vec<ApiProjectImage>,
    #[serde(default)]
    repo_url: Option<String>,
    #[serde(default)]
    demo_url: Option<String>,
    #[serde(default)]
    featured: bool,
    #[serde(default, with = "time::serde::iso8601::option")]
    published_at: Option<OffsetDateTime>,
}

impl ApiProject {
    fn into_record(self) -> ProjectRecord {
        ProjectRecord {
            id: self.id,
            slug: self.slug,
            title: self.title,
            summary: self.summary,
            body_html: self.body_html,
            images: self
                .images
                .into_iter()
                .map(|image| ProjectImage {
                    url: image.url,
                    caption: image.caption,
                })
                .collect(),
            repo_url: self.repo_url,
            demo_url: self.demo_url,
            featured: self.featured,
            published_at: self.published_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSocialLink {
    platform: String,
    url: String,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiProfile {
    name: String,
    #[serde(default)]
    headline: String,
    #[serde(default)]
    bio: String,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    social_links: Vec<ApiSocialLink>,
}

impl ApiProfile {
    fn into_record(self) -> ProfileRecord {
        ProfileRecord {
            name: self.name,
            headline: self.headline,
            bio: self.bio,
            avatar_url: self.avatar_url,
            location: self.location,
            email: self.email,
            website: self.website,
            social_links: self
                .social_links
                .into_iter()
                .map(|link| SocialLink {
                    platform: link.platform,
                    url: link.url,
                    username: link.username,
                })
                .collect(),
        }
    }
}
