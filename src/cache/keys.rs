//! Content class definitions.
//!
//! Every cacheable piece of content belongs to exactly one class. List
//! classes cache a whole collection under a single freshness clock; detail
//! classes cache individual entries by slug, each with its own clock.

/// Collection-valued content classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListClass {
    /// Blog post summaries for the index page.
    BlogPosts,
    /// Project summaries for the portfolio grid.
    Projects,
    /// Tags used for filtering the blog index.
    Tags,
}

/// Slug-keyed content classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailClass {
    /// A single blog post with its full body.
    BlogPost,
    /// A single project with its image gallery.
    Project,
}

/// Union of every cacheable content class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentClass {
    List(ListClass),
    Detail(DetailClass),
    /// The site owner's profile, a singleton slot with one clock.
    Profile,
}

impl ListClass {
    pub fn label(self) -> &'static str {
        match self {
            Self::BlogPosts => "blog_posts",
            Self::Projects => "projects",
            Self::Tags => "tags",
        }
    }
}

impl DetailClass {
    pub fn label(self) -> &'static str {
        match self {
            Self::BlogPost => "blog_post",
            Self::Project => "project",
        }
    }
}

impl ContentClass {
    pub fn label(self) -> &'static str {
        match self {
            Self::List(class) => class.label(),
            Self::Detail(class) => class.label(),
            Self::Profile => "profile",
        }
    }
}

impl From<ListClass> for ContentClass {
    fn from(class: ListClass) -> Self {
        Self::List(class)
    }
}

impl From<DetailClass> for ContentClass {
    fn from(class: DetailClass) -> Self {
        Self::Detail(class)
    }
}
