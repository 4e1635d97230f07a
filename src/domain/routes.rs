//! Detail-route patterns.
//!
//! Only two route shapes carry preloadable detail data: `/blog/:slug` and
//! `/projects/:slug`. Everything else (index pages, the about page, external
//! links) navigates without a preload.

/// A parsed detail route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailRoute {
    BlogPost(String),
    Project(String),
}

impl DetailRoute {
    /// Parse a target path against the known detail-route patterns.
    ///
    /// A trailing slash is tolerated; an empty slug or one containing a
    /// further path segment is not a detail route.
    pub fn parse(path: &str) -> Option<Self> {
        if let Some(slug) = slug_segment(path, "/blog/") {
            return Some(Self::BlogPost(slug));
        }
        if let Some(slug) = slug_segment(path, "/projects/") {
            return Some(Self::Project(slug));
        }
        None
    }

    pub fn slug(&self) -> &str {
        match self {
            Self::BlogPost(slug) | Self::Project(slug) => slug,
        }
    }
}

fn slug_segment(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() || rest.contains('/') {
        return None;
    }
    Some(rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_blog_and_project_slugs() {
        assert_eq!(
            DetailRoute::parse("/blog/hello-world"),
            Some(DetailRoute::BlogPost("hello-world".to_string()))
        );
        assert_eq!(
            DetailRoute::parse("/projects/vetrina/"),
            Some(DetailRoute::Project("vetrina".to_string()))
        );
    }

    #[test]
    fn rejects_non_detail_paths() {
        assert_eq!(DetailRoute::parse("/"), None);
        assert_eq!(DetailRoute::parse("/blog"), None);
        assert_eq!(DetailRoute::parse("/blog/"), None);
        assert_eq!(DetailRoute::parse("/about"), None);
        assert_eq!(DetailRoute::parse("/blog/a/b"), None);
        assert_eq!(DetailRoute::parse("/projects//"), None);
    }
}
