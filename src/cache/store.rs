//! In-memory content store.
//!
//! Pure data plus synchronous mutation; no I/O happens here. List classes
//! keep one collection and one clock per class; detail classes keep a value
//! and a clock per slug. Writes are whole-value replacements, never merges,
//! and are gated by write tickets: a response carried across `clear()`, or
//! one from a request that has since been superseded for the same key, is
//! discarded instead of landing on top of newer data.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::time::Instant;

use crate::domain::entities::{
    PostDetailRecord, PostRecord, ProfileRecord, ProjectRecord, TagRecord,
};

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

/// Ordering token for a single store write.
///
/// Issued before a fetch starts; the commit only applies if the store epoch
/// is unchanged and the sequence number is the highest seen for the target
/// class or key.
#[derive(Debug, Clone, Copy)]
pub struct WriteTicket {
    epoch: u64,
    seq: u64,
}

/// Snapshot of a list class slot.
#[derive(Debug, Clone)]
pub struct ListReading<T> {
    pub items: Option<Vec<T>>,
    pub fetched_at: Option<Instant>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Snapshot of one detail entry.
#[derive(Debug, Clone)]
pub struct DetailReading<T> {
    pub value: Option<T>,
    pub fetched_at: Option<Instant>,
    pub error: Option<String>,
}

/// Snapshot of the profile singleton slot.
#[derive(Debug, Clone)]
pub struct SingletonReading<T> {
    pub value: Option<T>,
    pub fetched_at: Option<Instant>,
    pub is_loading: bool,
    pub error: Option<String>,
}

struct ListSlot<T> {
    items: Option<Vec<T>>,
    fetched_at: Option<Instant>,
    last_seq: u64,
    is_loading: bool,
    error: Option<String>,
}

impl<T: Clone> ListSlot<T> {
    fn new() -> Self {
        Self {
            items: None,
            fetched_at: None,
            last_seq: 0,
            is_loading: false,
            error: None,
        }
    }

    fn reading(&self) -> ListReading<T> {
        ListReading {
            items: self.items.clone(),
            fetched_at: self.fetched_at,
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }

    fn commit(&mut self, items: Vec<T>, seq: u64) -> bool {
        if seq <= self.last_seq {
            return false;
        }
        self.items = Some(items);
        self.fetched_at = Some(Instant::now());
        self.last_seq = seq;
        self.error = None;
        true
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

struct SingletonSlot<T> {
    value: Option<T>,
    fetched_at: Option<Instant>,
    last_seq: u64,
    is_loading: bool,
    error: Option<String>,
}

impl<T: Clone> SingletonSlot<T> {
    fn new() -> Self {
        Self {
            value: None,
            fetched_at: None,
            last_seq: 0,
            is_loading: false,
            error: None,
        }
    }

    fn reading(&self) -> SingletonReading<T> {
        SingletonReading {
            value: self.value.clone(),
            fetched_at: self.fetched_at,
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }

    fn commit(&mut self, value: T, seq: u64) -> bool {
        if seq <= self.last_seq {
            return false;
        }
        self.value = Some(value);
        self.fetched_at = Some(Instant::now());
        self.last_seq = seq;
        self.error = None;
        true
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

struct DetailSlot<T> {
    values: HashMap<String, T>,
    // One clock per slug. A shared class-wide clock would make an old slug
    // look fresh merely because a different slug was fetched recently.
    fetched_at: HashMap<String, Instant>,
    last_seq: HashMap<String, u64>,
    error: Option<String>,
}

impl<T: Clone> DetailSlot<T> {
    fn new() -> Self {
        Self {
            values: HashMap::new(),
            fetched_at: HashMap::new(),
            last_seq: HashMap::new(),
            error: None,
        }
    }

    fn reading(&self, slug: &str) -> DetailReading<T> {
        DetailReading {
            value: self.values.get(slug).cloned(),
            fetched_at: self.fetched_at.get(slug).copied(),
            error: self.error.clone(),
        }
    }

    fn commit(&mut self, slug: &str, value: T, seq: u64) -> bool {
        let last = self.last_seq.get(slug).copied().unwrap_or(0);
        if seq <= last {
            return false;
        }
        self.values.insert(slug.to_string(), value);
        self.fetched_at.insert(slug.to_string(), Instant::now());
        self.last_seq.insert(slug.to_string(), seq);
        true
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Process-wide content store for the five content classes plus the profile
/// singleton. Thread-safe; every accessor takes a short-lived lock.
pub struct ContentStore {
    blog_posts: RwLock<ListSlot<PostRecord>>,
    projects: RwLock<ListSlot<ProjectRecord>>,
    tags: RwLock<ListSlot<TagRecord>>,
    profile: RwLock<SingletonSlot<ProfileRecord>>,
    blog_details: RwLock<DetailSlot<PostDetailRecord>>,
    project_details: RwLock<DetailSlot<ProjectRecord>>,
    epoch: AtomicU64,
    seq: AtomicU64,
}

impl ContentStore {
    pub fn new() -> Self {
        Self {
            blog_posts: RwLock::new(ListSlot::new()),
            projects: RwLock::new(ListSlot::new()),
            tags: RwLock::new(ListSlot::new()),
            profile: RwLock::new(SingletonSlot::new()),
            blog_details: RwLock::new(DetailSlot::new()),
            project_details: RwLock::new(DetailSlot::new()),
            epoch: AtomicU64::new(0),
            seq: AtomicU64::new(0),
        }
    }

    /// Issue an ordering ticket for a write that is about to start.
    pub fn begin_write(&self) -> WriteTicket {
        WriteTicket {
            epoch: self.epoch.load(Ordering::SeqCst),
            seq: self.seq.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    fn ticket_current(&self, ticket: WriteTicket) -> bool {
        ticket.epoch == self.epoch.load(Ordering::SeqCst)
    }

    // ========================================================================
    // List classes
    // ========================================================================

    pub fn read_blog_posts(&self) -> ListReading<PostRecord> {
        rw_read(&self.blog_posts, SOURCE, "read_blog_posts").reading()
    }

    pub fn read_projects(&self) -> ListReading<ProjectRecord> {
        rw_read(&self.projects, SOURCE, "read_projects").reading()
    }

    pub fn read_tags(&self) -> ListReading<TagRecord> {
        rw_read(&self.tags, SOURCE, "read_tags").reading()
    }

    pub fn commit_blog_posts(&self, items: Vec<PostRecord>, ticket: WriteTicket) -> bool {
        self.ticket_current(ticket)
            && rw_write(&self.blog_posts, SOURCE, "commit_blog_posts").commit(items, ticket.seq)
    }

    pub fn commit_projects(&self, items: Vec<ProjectRecord>, ticket: WriteTicket) -> bool {
        self.ticket_current(ticket)
            && rw_write(&self.projects, SOURCE, "commit_projects").commit(items, ticket.seq)
    }

    pub fn commit_tags(&self, items: Vec<TagRecord>, ticket: WriteTicket) -> bool {
        self.ticket_current(ticket)
            && rw_write(&self.tags, SOURCE, "commit_tags").commit(items, ticket.seq)
    }

    pub fn set_blog_posts_loading(&self, loading: bool) {
        rw_write(&self.blog_posts, SOURCE, "set_blog_posts_loading").is_loading = loading;
    }

    pub fn set_projects_loading(&self, loading: bool) {
        rw_write(&self.projects, SOURCE, "set_projects_loading").is_loading = loading;
    }

    pub fn set_tags_loading(&self, loading: bool) {
        rw_write(&self.tags, SOURCE, "set_tags_loading").is_loading = loading;
    }

    pub fn set_blog_posts_error(&self, error: Option<String>) {
        rw_write(&self.blog_posts, SOURCE, "set_blog_posts_error").error = error;
    }

    pub fn set_projects_error(&self, error: Option<String>) {
        rw_write(&self.projects, SOURCE, "set_projects_error").error = error;
    }

    pub fn set_tags_error(&self, error: Option<String>) {
        rw_write(&self.tags, SOURCE, "set_tags_error").error = error;
    }

    // ========================================================================
    // Profile singleton
    // ========================================================================

    pub fn read_profile(&self) -> SingletonReading<ProfileRecord> {
        rw_read(&self.profile, SOURCE, "read_profile").reading()
    }

    pub fn commit_profile(&self, value: ProfileRecord, ticket: WriteTicket) -> bool {
        self.ticket_current(ticket)
            && rw_write(&self.profile, SOURCE, "commit_profile").commit(value, ticket.seq)
    }

    pub fn set_profile_loading(&self, loading: bool) {
        rw_write(&self.profile, SOURCE, "set_profile_loading").is_loading = loading;
    }

    pub fn set_profile_error(&self, error: Option<String>) {
        rw_write(&self.profile, SOURCE, "set_profile_error").error = error;
    }

    // ========================================================================
    // Detail classes
    // ========================================================================

    pub fn read_blog_detail(&self, slug: &str) -> DetailReading<PostDetailRecord> {
        rw_read(&self.blog_details, SOURCE, "read_blog_detail").reading(slug)
    }

    pub fn read_project_detail(&self, slug: &str) -> DetailReading<ProjectRecord> {
        rw_read(&self.project_details, SOURCE, "read_project_detail").reading(slug)
    }

    pub fn commit_blog_detail(
        &self,
        slug: &str,
        value: PostDetailRecord,
        ticket: WriteTicket,
    ) -> bool {
        self.ticket_current(ticket)
            && rw_write(&self.blog_details, SOURCE, "commit_blog_detail").commit(
                slug,
                value,
                ticket.seq,
            )
    }

    pub fn commit_project_detail(
        &self,
        slug: &str,
        value: ProjectRecord,
        ticket: WriteTicket,
    ) -> bool {
        self.ticket_current(ticket)
            && rw_write(&self.project_details, SOURCE, "commit_project_detail").commit(
                slug,
                value,
                ticket.seq,
            )
    }

    pub fn set_blog_detail_error(&self, error: Option<String>) {
        rw_write(&self.blog_details, SOURCE, "set_blog_detail_error").error = error;
    }

    pub fn set_project_detail_error(&self, error: Option<String>) {
        rw_write(&self.project_details, SOURCE, "set_project_detail_error").error = error;
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Wipe every slot back to "never fetched" and advance the epoch so
    /// in-flight writes started before the clear are discarded on commit.
    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        rw_write(&self.blog_posts, SOURCE, "clear.blog_posts").reset();
        rw_write(&self.projects, SOURCE, "clear.projects").reset();
        rw_write(&self.tags, SOURCE, "clear.tags").reset();
        rw_write(&self.profile, SOURCE, "clear.profile").reset();
        rw_write(&self.blog_details, SOURCE, "clear.blog_details").reset();
        rw_write(&self.project_details, SOURCE, "clear.project_details").reset();
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}
