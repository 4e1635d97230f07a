//! Cache freshness configuration.
//!
//! Max-ages are configuration constants, not runtime state. Lists of
//! frequently edited content get short windows; relatively static detail
//! pages keep longer ones.

use std::time::Duration;

use crate::config::CacheSettings;

use super::keys::{ContentClass, DetailClass, ListClass};

const DEFAULT_BLOG_LIST_TTL_SECS: u64 = 10 * 60;
const DEFAULT_PROJECT_LIST_TTL_SECS: u64 = 60 * 60;
const DEFAULT_TAG_LIST_TTL_SECS: u64 = 10 * 60;
const DEFAULT_BLOG_DETAIL_TTL_SECS: u64 = 10 * 60;
const DEFAULT_PROJECT_DETAIL_TTL_SECS: u64 = 60 * 60;
const DEFAULT_PROFILE_TTL_SECS: u64 = 10 * 60;

/// Per-class maximum ages for cached content.
#[derive(Debug, Clone)]
pub struct CacheTtls {
    pub blog_list: Duration,
    pub project_list: Duration,
    pub tag_list: Duration,
    pub blog_detail: Duration,
    pub project_detail: Duration,
    pub profile: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            blog_list: Duration::from_secs(DEFAULT_BLOG_LIST_TTL_SECS),
            project_list: Duration::from_secs(DEFAULT_PROJECT_LIST_TTL_SECS),
            tag_list: Duration::from_secs(DEFAULT_TAG_LIST_TTL_SECS),
            blog_detail: Duration::from_secs(DEFAULT_BLOG_DETAIL_TTL_SECS),
            project_detail: Duration::from_secs(DEFAULT_PROJECT_DETAIL_TTL_SECS),
            profile: Duration::from_secs(DEFAULT_PROFILE_TTL_SECS),
        }
    }
}

impl CacheTtls {
    /// Maximum age for the given content class.
    pub fn ttl(&self, class: ContentClass) -> Duration {
        match class {
            ContentClass::List(ListClass::BlogPosts) => self.blog_list,
            ContentClass::List(ListClass::Projects) => self.project_list,
            ContentClass::List(ListClass::Tags) => self.tag_list,
            ContentClass::Detail(DetailClass::BlogPost) => self.blog_detail,
            ContentClass::Detail(DetailClass::Project) => self.project_detail,
            ContentClass::Profile => self.profile,
        }
    }
}

impl From<&CacheSettings> for CacheTtls {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            blog_list: Duration::from_secs(settings.blog_list_ttl_secs),
            project_list: Duration::from_secs(settings.project_list_ttl_secs),
            tag_list: Duration::from_secs(settings.tag_list_ttl_secs),
            blog_detail: Duration::from_secs(settings.blog_detail_ttl_secs),
            project_detail: Duration::from_secs(settings.project_detail_ttl_secs),
            profile: Duration::from_secs(settings.profile_ttl_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_windows() {
        let ttls = CacheTtls::default();
        assert_eq!(
            ttls.ttl(ContentClass::List(ListClass::BlogPosts)),
            Duration::from_secs(600)
        );
        assert_eq!(
            ttls.ttl(ContentClass::Detail(DetailClass::Project)),
            Duration::from_secs(3600)
        );
        assert_eq!(ttls.ttl(ContentClass::Profile), Duration::from_secs(600));
    }
}
